//! # Pipeline — Variant Configuration and Render Pipeline
//!
//! The three samples share one pipeline shape. What differs is captured by
//! [`PipelineConfig`]: the vertex layout, how many lights the shader reads,
//! and whether a texture is bound.
//!
//! ## Bind Groups
//!
//! ```text
//! group 0  binding 0  FrameConstants       uniform, dynamic offset (per draw)
//!          binding 1  PersistentConstants  uniform (written once)
//! group 1  binding 0  texture_2d<f32>      textured variant only
//!          binding 1  sampler
//! ```
//!
//! ## Rasterization
//!
//! Clockwise triangles are front faces and back faces are culled; the cube
//! and the triangle are wound for this under the left-handed camera. Depth
//! uses `Depth32Float` with a `Less` test, cleared to 1.0 every frame, and the
//! depth texture is recreated whenever the surface size changes.

use std::path::PathBuf;

use super::constants::{FrameConstants, PersistentConstants};
use super::vertex::VertexLayout;
use crate::config::Variant;
use crate::render::GpuContext;

/// Depth texture format.
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Everything that distinguishes one sample's pipeline from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub variant: Variant,
    pub layout: VertexLayout,
    pub light_count: usize,
    pub textured: bool,
}

impl PipelineConfig {
    pub fn for_variant(variant: Variant) -> Self {
        let layout = match variant {
            Variant::Triangle => VertexLayout::Position,
            Variant::ColorCube => VertexLayout::PositionNormalColor,
            Variant::TexturedCube => VertexLayout::PositionNormalTexCoordColor,
        };
        Self {
            variant,
            layout,
            light_count: variant.light_count(),
            textured: variant.textured(),
        }
    }

    /// File name of the variant's WGSL shader.
    pub fn shader_file(&self) -> &'static str {
        match self.variant {
            Variant::Triangle => "triangle.wgsl",
            Variant::ColorCube => "color_cube.wgsl",
            Variant::TexturedCube => "textured_cube.wgsl",
        }
    }

    /// Embedded WGSL source for the variant.
    pub fn shader_source(&self) -> &'static str {
        match self.variant {
            Variant::Triangle => include_str!("shaders/triangle.wgsl"),
            Variant::ColorCube => include_str!("shaders/color_cube.wgsl"),
            Variant::TexturedCube => include_str!("shaders/textured_cube.wgsl"),
        }
    }

    /// Shader source on disk, when running from a checkout (for hot-reload).
    pub fn shader_path(&self) -> Option<PathBuf> {
        let p = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("src")
            .join("render")
            .join("shaders")
            .join(self.shader_file());
        if p.exists() { Some(p) } else { None }
    }
}

/// The render pipeline, its bind group layouts, and the depth buffer.
pub(crate) struct SamplePipeline {
    pub config: PipelineConfig,
    pub pipeline: wgpu::RenderPipeline,
    pub constants_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group_layout: Option<wgpu::BindGroupLayout>,
    pub depth_texture: wgpu::TextureView,
    pub depth_size: (u32, u32),
}

impl SamplePipeline {
    pub fn new(gpu: &GpuContext, config: PipelineConfig) -> Self {
        let device = &gpu.device;

        // ── Bind group layout 0: constants ──────────────────────────────
        let constants_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("constants layout"),
                entries: &[
                    // FrameConstants, one aligned slot per draw
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<FrameConstants>() as u64,
                            ),
                        },
                        count: None,
                    },
                    // PersistentConstants
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<PersistentConstants>() as u64,
                            ),
                        },
                        count: None,
                    },
                ],
            });

        // ── Bind group layout 1: texture + sampler ──────────────────────
        let texture_bind_group_layout = config.textured.then(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            })
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(config.shader_file()),
            source: wgpu::ShaderSource::Wgsl(config.shader_source().into()),
        });

        let pipeline = build_render_pipeline(
            gpu,
            &config,
            &constants_bind_group_layout,
            texture_bind_group_layout.as_ref(),
            &shader,
        );

        let (w, h) = gpu.surface_size();
        let depth_texture = create_depth_texture(device, w, h);

        log::debug!(
            "Created {:?} pipeline: {:?} layout, {} light(s), textured: {}",
            config.variant,
            config.layout,
            config.light_count,
            config.textured
        );

        Self {
            config,
            pipeline,
            constants_bind_group_layout,
            texture_bind_group_layout,
            depth_texture,
            depth_size: (w, h),
        }
    }

    /// Recreate the depth texture if the surface size changed.
    pub fn resize_depth_if_needed(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if (width, height) != self.depth_size && width > 0 && height > 0 {
            self.depth_texture = create_depth_texture(device, width, height);
            self.depth_size = (width, height);
        }
    }

    /// Build a new render pipeline from a shader module (hot-reload).
    ///
    /// Reuses the existing bind group layouts. Returns the candidate pipeline
    /// without swapping it in; the caller checks the error scope first.
    pub fn build_pipeline(&self, gpu: &GpuContext, shader: &wgpu::ShaderModule) -> wgpu::RenderPipeline {
        build_render_pipeline(
            gpu,
            &self.config,
            &self.constants_bind_group_layout,
            self.texture_bind_group_layout.as_ref(),
            shader,
        )
    }
}

fn build_render_pipeline(
    gpu: &GpuContext,
    config: &PipelineConfig,
    constants_layout: &wgpu::BindGroupLayout,
    texture_layout: Option<&wgpu::BindGroupLayout>,
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    let mut bind_group_layouts = vec![constants_layout];
    bind_group_layouts.extend(texture_layout);

    let pipeline_layout = gpu.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("sample pipeline layout"),
        bind_group_layouts: &bind_group_layouts,
        push_constant_ranges: &[],
    });

    gpu.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("sample pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[config.layout.buffer_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.surface_format(),
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Cw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Create a depth texture at the given dimensions.
fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
