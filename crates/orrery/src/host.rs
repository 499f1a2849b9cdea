//! Window and event loop via winit.
//!
//! [`SampleHost`] implements [`winit::application::ApplicationHandler`] and
//! drives the renderer's lifecycle:
//!
//! | Event                 | Action                                          |
//! |-----------------------|-------------------------------------------------|
//! | `resumed`             | create window, device, and renderer             |
//! | `Resized`             | resize surface, camera aspect, depth buffer     |
//! | `RedrawRequested`     | tick clock, hot-reload, update scene, render    |
//! | `CloseRequested`      | destroy renderer, exit                          |
//!
//! Startup failures are logged and end the event loop.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::camera::ViewerCamera;
use crate::config::SampleConfig;
use crate::error::RenderResult;
use crate::render::pass::render_frame;
use crate::render::{FrameRenderer, GpuContext};
use crate::time::Time;

/// Where the renderer is in its life.
pub enum Lifecycle {
    /// No device yet.
    Uninitialized,
    /// Resources exist; frames can be drawn.
    Ready(FrameRenderer),
    /// Resources released. No further calls are made.
    Destroyed,
}

/// The application state winit drives.
pub struct SampleHost {
    config: SampleConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    lifecycle: Lifecycle,
    camera: ViewerCamera,
    time: Time,
    #[cfg(feature = "hot-reload")]
    assets: Option<crate::asset::AssetServer>,
}

impl SampleHost {
    pub fn new(config: SampleConfig) -> Self {
        let camera = ViewerCamera::new(&config.camera, config.width, config.height);
        Self {
            config,
            window: None,
            gpu: None,
            lifecycle: Lifecycle::Uninitialized,
            camera,
            time: Time::new(),
            #[cfg(feature = "hot-reload")]
            assets: None,
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Create the window, device, and renderer.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> RenderResult<()> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let gpu = GpuContext::new(window.clone(), self.config.vsync)?;
        let (w, h) = gpu.surface_size();
        self.camera.set_window(w, h);

        let renderer = FrameRenderer::create(&gpu, &self.config)?;

        #[cfg(feature = "hot-reload")]
        {
            let mut assets = crate::asset::AssetServer::new();
            assets.watch_sample(&renderer);
            self.assets = Some(assets);
        }

        self.lifecycle = Lifecycle::Ready(renderer);
        self.gpu = Some(gpu);
        self.window = Some(window);
        self.time = Time::new();
        Ok(())
    }

    /// Release the renderer's resources. Safe to call more than once.
    fn teardown(&mut self) {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Destroyed) {
            Lifecycle::Ready(renderer) => {
                log::info!("Shutting down after {} frames", self.time.frame_count());
                renderer.destroy();
            }
            Lifecycle::Uninitialized | Lifecycle::Destroyed => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Lifecycle::Ready(renderer)) = (&mut self.gpu, &mut self.lifecycle) else {
            return;
        };

        self.time.update();

        #[cfg(feature = "hot-reload")]
        if let Some(assets) = &mut self.assets {
            assets.process_reloads(gpu, renderer);
        }

        renderer.update_scene(self.time.elapsed_secs_f64(), self.time.delta_secs());

        let camera = &self.camera;
        match render_frame(gpu, |frame| renderer.render_frame(gpu, frame, camera)) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory!");
                self.teardown();
                event_loop.exit();
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
            }
        }
    }
}

impl ApplicationHandler for SampleHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.lifecycle, Lifecycle::Uninitialized) {
            return;
        }

        match self.start(event_loop) {
            Ok(()) => log::info!("{:?} sample ready", self.config.variant),
            Err(e) => {
                log::error!("Failed to start sample: {e}");
                self.teardown();
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                self.teardown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                    self.camera.set_window(size.width, size.height);
                    if let Lifecycle::Ready(renderer) = &mut self.lifecycle {
                        renderer.resize(gpu);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);

                // Request next frame.
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_host_is_uninitialized() {
        let host = SampleHost::new(SampleConfig::default());
        assert!(matches!(host.lifecycle(), Lifecycle::Uninitialized));
    }

    #[test]
    fn teardown_is_terminal_and_repeatable() {
        let mut host = SampleHost::new(SampleConfig::default());
        host.teardown();
        assert!(matches!(host.lifecycle(), Lifecycle::Destroyed));
        host.teardown();
        assert!(matches!(host.lifecycle(), Lifecycle::Destroyed));
    }

    #[test]
    fn camera_starts_at_configured_size() {
        let mut config = SampleConfig::default();
        config.width = 1024;
        config.height = 512;
        let host = SampleHost::new(config);
        assert!((host.camera.aspect() - 2.0).abs() < 1e-6);
    }
}
