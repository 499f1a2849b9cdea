//! Frame orchestration.
//!
//! [`render_frame`] acquires the swapchain texture, hands a [`FrameContext`]
//! to the caller to record its passes, then submits and presents. Surface
//! errors are returned to the host, which decides whether to reconfigure,
//! skip, or exit.

use crate::render::gpu::GpuContext;

/// Background color a frame is cleared to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub [f64; 4]);

impl ClearColor {
    /// Midnight blue.
    pub const MIDNIGHT_BLUE: Self = Self([0.098, 0.098, 0.439, 1.0]);

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.0[0],
            g: self.0[1],
            b: self.0[2],
            a: self.0[3],
        }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::MIDNIGHT_BLUE
    }
}

/// Per-frame render context passed to the renderer.
///
/// Created by [`render_frame`], which acquires the surface texture and encoder.
pub struct FrameContext {
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
}

/// Record one frame with `record`, then submit and present it.
///
/// In debug builds the frame runs inside a validation error scope and any
/// captured error fails a debug assertion. Release builds leave per-frame
/// errors unchecked.
pub fn render_frame(
    gpu: &GpuContext,
    record: impl FnOnce(&mut FrameContext),
) -> Result<(), wgpu::SurfaceError> {
    let output = gpu.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("orrery frame encoder"),
        });

    let mut frame = FrameContext { encoder, view };

    #[cfg(debug_assertions)]
    gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);

    record(&mut frame);

    gpu.queue.submit(std::iter::once(frame.encoder.finish()));

    #[cfg(debug_assertions)]
    {
        let error = pollster::block_on(gpu.device.pop_error_scope());
        debug_assert!(error.is_none(), "frame validation failed: {error:?}");
    }

    output.present();

    Ok(())
}
