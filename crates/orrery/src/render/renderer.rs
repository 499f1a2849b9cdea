//! # Frame Renderer
//!
//! [`FrameRenderer`] owns every GPU resource a sample needs and exposes the
//! three lifecycle hooks the host drives:
//!
//! ```text
//! FrameRenderer::create ──► Ready ──► { update_scene → render_frame }* ──► destroy
//! ```
//!
//! Holding a `FrameRenderer` value means resources exist; `destroy` consumes
//! it, so nothing can render after teardown.
//!
//! ## Drawing
//!
//! Each frame draws the center object, then one small indicator cube per
//! light. The pure part of that (which objects, with which transforms and
//! constants) is a [`DrawPlan`] and can be inspected without a GPU.
//! [`FrameConstantsStaging::stage`] writes each plan item's constants into its
//! own slot; recording uploads all slots at once and binds each slot with the
//! dynamic offset `stage` returned for its draw.

use wgpu::util::DeviceExt;

use super::constants::{FrameConstants, FrameConstantsStaging, PersistentConstants};
use super::mesh::{GpuMesh, Mesh};
use super::pass::{ClearColor, FrameContext};
use super::pipeline::{PipelineConfig, SamplePipeline};
use super::texture::SampleTexture;
use crate::camera::ViewerCamera;
use crate::config::{SampleConfig, Variant};
use crate::error::{RenderError, RenderResult};
use crate::math::Mat4;
use crate::render::GpuContext;
use crate::scene::{light_indicator_transform, SceneState, MAX_LIGHTS};

/// Most objects any variant draws per frame.
pub const MAX_DRAWS: usize = 1 + MAX_LIGHTS;

/// How each object in a plan is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// Indexed draw over `n` indices.
    Indexed(u32),
    /// Non-indexed draw over `n` vertices.
    NonIndexed(u32),
}

/// One object to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// Object-to-world transform.
    pub object: Mat4,
    /// Constants uploaded for this draw.
    pub constants: FrameConstants,
}

/// Everything drawn in one frame, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPlan {
    pub kind: DrawKind,
    pub items: Vec<DrawItem>,
}

impl DrawPlan {
    /// Plan the center object followed by one indicator per light.
    pub fn build(scene: &SceneState, kind: DrawKind, view: Mat4, projection: Mat4) -> Self {
        let lights = scene.packed_lights();
        let item = |object: Mat4| DrawItem {
            object,
            constants: FrameConstants::new(object, view, projection, lights),
        };

        let mut items = Vec::with_capacity(1 + scene.lights().len());
        items.push(item(scene.model()));
        items.extend(
            scene
                .lights()
                .iter()
                .map(|&direction| item(light_indicator_transform(direction))),
        );

        Self { kind, items }
    }
}

/// GPU resources and scene state for one running sample.
pub struct FrameRenderer {
    pipeline: SamplePipeline,
    mesh: GpuMesh,
    frame_buffer: wgpu::Buffer,
    persistent_buffer: wgpu::Buffer,
    constants_bind_group: wgpu::BindGroup,
    staging: FrameConstantsStaging,
    texture: Option<SampleTexture>,
    scene: SceneState,
    clear_color: ClearColor,
}

impl FrameRenderer {
    /// Create every GPU resource the configured variant needs.
    ///
    /// Mesh validation and texture decoding fail with their own errors. All
    /// device calls run inside validation and out-of-memory error scopes; a
    /// captured error fails creation with [`RenderError::ResourceCreation`].
    pub fn create(gpu: &GpuContext, config: &SampleConfig) -> RenderResult<Self> {
        let pipeline_config = PipelineConfig::for_variant(config.variant);

        let mesh = match config.variant {
            Variant::Triangle => Mesh::triangle(),
            Variant::ColorCube | Variant::TexturedCube => Mesh::cube(),
        };
        mesh.validate()?;

        gpu.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let resources = Self::create_resources(gpu, config, pipeline_config, &mesh);

        let validation = pollster::block_on(gpu.device.pop_error_scope());
        let out_of_memory = pollster::block_on(gpu.device.pop_error_scope());

        let renderer = resources?;
        if let Some(err) = validation.or(out_of_memory) {
            return Err(RenderError::ResourceCreation {
                label: "sample resources",
                message: err.to_string(),
            });
        }

        log::info!(
            "Created {:?} resources: {} draw slot(s) of {} bytes",
            config.variant,
            renderer.staging.slots(),
            renderer.staging.stride()
        );
        Ok(renderer)
    }

    fn create_resources(
        gpu: &GpuContext,
        config: &SampleConfig,
        pipeline_config: PipelineConfig,
        mesh: &Mesh,
    ) -> RenderResult<Self> {
        let device = &gpu.device;
        let pipeline = SamplePipeline::new(gpu, pipeline_config);
        let mesh = GpuMesh::upload(device, mesh, pipeline_config.layout);

        // One slot for the center object plus one per light indicator.
        let staging =
            FrameConstantsStaging::new(1 + pipeline_config.light_count, gpu.uniform_alignment());

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame constants buffer"),
            size: staging.size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let persistent_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("persistent constants buffer"),
            contents: bytemuck::bytes_of(&PersistentConstants::default()),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let constants_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("constants bind group"),
            layout: &pipeline.constants_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &frame_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(std::mem::size_of::<FrameConstants>() as u64),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: persistent_buffer.as_entire_binding(),
                },
            ],
        });

        let texture = match &pipeline.texture_bind_group_layout {
            Some(layout) => Some(SampleTexture::load(gpu, layout, &config.texture_path)?),
            None => None,
        };

        Ok(Self {
            pipeline,
            mesh,
            frame_buffer,
            persistent_buffer,
            constants_bind_group,
            staging,
            texture,
            scene: SceneState::new(
                pipeline_config.light_count,
                config.variant.uses_camera(),
            ),
            clear_color: ClearColor(config.clear_color),
        })
    }

    /// Advance the scene to absolute time `time`. No GPU work.
    pub fn update_scene(&mut self, time: f64, delta: f32) {
        self.scene.update(time, delta);
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        self.pipeline.config
    }

    /// Plan this frame's draws. The triangle ignores the camera and draws
    /// with identity matrices.
    pub fn plan_draws(&self, camera: &ViewerCamera) -> DrawPlan {
        let kind = match self.mesh.index_buffer {
            Some(_) => DrawKind::Indexed(self.mesh.element_count),
            None => DrawKind::NonIndexed(self.mesh.element_count),
        };
        let (view, projection) = if self.pipeline.config.variant.uses_camera() {
            (camera.view_matrix(), camera.projection_matrix())
        } else {
            (Mat4::IDENTITY, Mat4::IDENTITY)
        };
        DrawPlan::build(&self.scene, kind, view, projection)
    }

    /// Record the frame: clear, then draw every planned object.
    pub fn render_frame(&mut self, gpu: &GpuContext, frame: &mut FrameContext, camera: &ViewerCamera) {
        let plan = self.plan_draws(camera);
        let offsets = self.staging.stage(&plan);
        gpu.queue
            .write_buffer(&self.frame_buffer, 0, self.staging.as_bytes());

        let (w, h) = gpu.surface_size();
        self.pipeline.resize_depth_if_needed(&gpu.device, w, h);

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sample pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.pipeline.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline.pipeline);
        pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        if let Some(index_buffer) = &self.mesh.index_buffer {
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        }
        if let Some(texture) = &self.texture {
            pass.set_bind_group(1, &texture.bind_group, &[]);
        }

        for offset in offsets {
            pass.set_bind_group(0, &self.constants_bind_group, &[offset]);
            match plan.kind {
                DrawKind::Indexed(count) => pass.draw_indexed(0..count, 0, 0..1),
                DrawKind::NonIndexed(count) => pass.draw(0..count, 0..1),
            }
        }
    }

    /// Track a swapchain resize.
    pub fn resize(&mut self, gpu: &GpuContext) {
        let (w, h) = gpu.surface_size();
        self.pipeline.resize_depth_if_needed(&gpu.device, w, h);
    }

    /// Rebuild the pipeline from new WGSL source, keeping the current one
    /// if the source does not validate. Returns whether the swap happened.
    pub fn reload_shader(&mut self, gpu: &GpuContext, source: &str) -> bool {
        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sample shader (hot-reload)"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let candidate = self.pipeline.build_pipeline(gpu, &shader);

        match pollster::block_on(gpu.device.pop_error_scope()) {
            Some(err) => {
                log::warn!("Shader error: {err}. Keeping old pipeline.");
                false
            }
            None => {
                self.pipeline.pipeline = candidate;
                true
            }
        }
    }

    /// Reload the bound texture from disk, if the variant has one.
    pub fn reload_texture(&mut self, gpu: &GpuContext) -> RenderResult<()> {
        if let (Some(texture), Some(layout)) =
            (&mut self.texture, &self.pipeline.texture_bind_group_layout)
        {
            texture.reload(gpu, layout)?;
            log::info!(
                "Reloaded texture '{}' ({}x{})",
                texture.path.display(),
                texture.size.0,
                texture.size.1
            );
        }
        Ok(())
    }

    /// Path of the bound texture, if any.
    pub fn texture_path(&self) -> Option<&std::path::Path> {
        self.texture.as_ref().map(|t| t.path.as_path())
    }

    /// Release every GPU resource.
    pub fn destroy(self) {
        log::info!("Destroying {:?} resources", self.pipeline.config.variant);
        self.frame_buffer.destroy();
        self.persistent_buffer.destroy();
        self.mesh.vertex_buffer.destroy();
        if let Some(index_buffer) = &self.mesh.index_buffer {
            index_buffer.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::math::{Vec3, Vec4};

    fn camera() -> ViewerCamera {
        ViewerCamera::new(&CameraConfig::default(), 800, 600)
    }

    fn plan_for(variant: Variant, time: f64) -> DrawPlan {
        let config = PipelineConfig::for_variant(variant);
        let mut scene = SceneState::new(config.light_count, variant.uses_camera());
        scene.update(time, 0.016);
        let kind = match variant {
            Variant::Triangle => DrawKind::NonIndexed(Mesh::triangle().element_count()),
            _ => DrawKind::Indexed(Mesh::cube().element_count()),
        };
        let cam = camera();
        let (view, projection) = if variant.uses_camera() {
            (cam.view_matrix(), cam.projection_matrix())
        } else {
            (Mat4::IDENTITY, Mat4::IDENTITY)
        };
        DrawPlan::build(&scene, kind, view, projection)
    }

    #[test]
    fn draw_counts_per_variant() {
        assert_eq!(plan_for(Variant::Triangle, 1.0).items.len(), 1);
        assert_eq!(plan_for(Variant::ColorCube, 1.0).items.len(), 2);
        assert_eq!(plan_for(Variant::TexturedCube, 1.0).items.len(), 3);
        assert!(plan_for(Variant::TexturedCube, 1.0).items.len() <= MAX_DRAWS);
    }

    #[test]
    fn triangle_is_one_plain_three_vertex_draw() {
        let plan = plan_for(Variant::Triangle, 2.5);
        assert_eq!(plan.kind, DrawKind::NonIndexed(3));
        assert_eq!(plan.items[0].object, Mat4::IDENTITY);
        assert_eq!(plan.items[0].constants.model_view_projection(), Mat4::IDENTITY);
        assert_eq!(plan.items[0].constants.light_dir, [[0.0; 4]; 2]);
    }

    #[test]
    fn cubes_draw_thirty_six_indices() {
        assert_eq!(plan_for(Variant::ColorCube, 0.0).kind, DrawKind::Indexed(36));
        assert_eq!(plan_for(Variant::TexturedCube, 0.0).kind, DrawKind::Indexed(36));
    }

    #[test]
    fn lit_cube_starts_at_identity() {
        let plan = plan_for(Variant::ColorCube, 0.0);
        assert_eq!(plan.items[0].object, Mat4::IDENTITY);
        let cam = camera();
        let expected = cam.projection_matrix() * cam.view_matrix();
        assert!(plan.items[0].constants.model_view_projection().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn indicators_follow_lights() {
        let plan = plan_for(Variant::TexturedCube, 0.0);
        let first = plan.items[1].object.transform_point3(Vec3::ZERO);
        let second = plan.items[2].object.transform_point3(Vec3::ZERO);
        assert!(first.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-5));
        assert!(second.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-5));
    }

    #[test]
    fn every_draw_carries_current_lights() {
        let plan = plan_for(Variant::TexturedCube, 0.7);
        let mut scene = SceneState::new(2, true);
        scene.update(0.7, 0.0);
        let expected = scene.packed_lights().map(|l: Vec4| l.to_array());
        for item in &plan.items {
            assert_eq!(item.constants.light_dir, expected);
        }
    }

    /// Column-major `model_view_projection` decoded from the first 64 bytes
    /// of a staged slot.
    fn staged_transform(staging: &FrameConstantsStaging, offset: u32) -> Mat4 {
        let start = offset as usize;
        let cols: Vec<f32> = staging.as_bytes()[start..start + 64]
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Mat4::from_cols_slice(&cols)
    }

    #[test]
    fn staged_slots_rebuild_each_draw_transform() {
        let time = 0.7;
        let plan = plan_for(Variant::TexturedCube, time);
        let mut staging = FrameConstantsStaging::new(MAX_DRAWS, 256);
        let offsets = staging.stage(&plan);
        assert_eq!(offsets, vec![0, 256, 512]);

        let mut scene = SceneState::new(2, true);
        scene.update(time, 0.0);
        let cam = camera();
        let view_projection = cam.projection_matrix() * cam.view_matrix();
        let objects = [
            scene.model(),
            light_indicator_transform(scene.lights()[0]),
            light_indicator_transform(scene.lights()[1]),
        ];

        for (i, object) in objects.iter().enumerate() {
            assert_eq!(offsets[i] as usize, i * staging.stride());
            let rebuilt = staged_transform(&staging, offsets[i]);
            assert!(
                rebuilt.abs_diff_eq(view_projection * *object, 1e-5),
                "draw {i} landed in the wrong slot"
            );
            assert_eq!(
                staging.read(i).light_dir,
                scene.packed_lights().map(|l: Vec4| l.to_array())
            );
        }
    }

    #[test]
    fn staging_fewer_draws_than_slots_leaves_the_rest_untouched() {
        let plan = plan_for(Variant::ColorCube, 1.0);
        let mut staging = FrameConstantsStaging::new(MAX_DRAWS, 256);
        let offsets = staging.stage(&plan);
        assert_eq!(offsets, vec![0, 256]);
        assert_eq!(staging.read(2), <FrameConstants as bytemuck::Zeroable>::zeroed());
    }
}
