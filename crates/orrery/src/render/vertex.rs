//! # Vertex — Records and Layout Descriptors
//!
//! Every sample draws from the same CPU-side [`Vertex`] record. What reaches
//! the GPU depends on the variant's [`VertexLayout`]: the layout packs only the
//! attributes its shader reads, tightly and in a fixed order.
//!
//! ```text
//! Position                     (12 bytes)
//! ┌──────────────┐
//! │ position     │
//! │ location(0)  │
//! └──────────────┘
//!
//! PositionNormalColor          (40 bytes)
//! ┌──────────────┬──────────────┬──────────────────┐
//! │ position  0  │ normal   12  │ color         24 │
//! │ location(0)  │ location(1)  │ location(2)      │
//! └──────────────┴──────────────┴──────────────────┘
//!
//! PositionNormalTexCoordColor  (48 bytes)
//! ┌──────────────┬──────────────┬──────────────┬──────────────────┐
//! │ position  0  │ normal   12  │ uv       24  │ color         32 │
//! │ location(0)  │ location(1)  │ location(2)  │ location(3)      │
//! └──────────────┴──────────────┴──────────────┴──────────────────┘
//! ```
//!
//! Shader locations follow attribute order, so a layout and its WGSL entry
//! point always agree without a lookup table.

use bytemuck::{Pod, Zeroable};

/// CPU-side vertex carrying every attribute any layout can select.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// A vertex with only a position; the other attributes are zero, color is opaque white.
    pub const fn from_position(position: [f32; 3]) -> Self {
        Self {
            position,
            normal: [0.0; 3],
            tex_coord: [0.0; 2],
            color: [1.0; 4],
        }
    }
}

/// One vertex attribute a layout can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Normal,
    TexCoord,
    Color,
}

impl Attribute {
    fn format(self) -> wgpu::VertexFormat {
        match self {
            Attribute::Position | Attribute::Normal => wgpu::VertexFormat::Float32x3,
            Attribute::TexCoord => wgpu::VertexFormat::Float32x2,
            Attribute::Color => wgpu::VertexFormat::Float32x4,
        }
    }

    fn components(self, vertex: &Vertex) -> &[f32] {
        match self {
            Attribute::Position => &vertex.position,
            Attribute::Normal => &vertex.normal,
            Attribute::TexCoord => &vertex.tex_coord,
            Attribute::Color => &vertex.color,
        }
    }
}

/// The attribute sets the samples use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    Position,
    PositionNormalColor,
    PositionNormalTexCoordColor,
}

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [
    // position: vec3<f32>
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
];

const POSITION_NORMAL_COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    // position: vec3<f32>
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    // normal: vec3<f32>
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    },
    // color: vec4<f32>
    wgpu::VertexAttribute {
        offset: 24,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x4,
    },
];

const POSITION_NORMAL_TEX_COORD_COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    // position: vec3<f32>
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    // normal: vec3<f32>
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    },
    // uv: vec2<f32>
    wgpu::VertexAttribute {
        offset: 24,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x2,
    },
    // color: vec4<f32>
    wgpu::VertexAttribute {
        offset: 32,
        shader_location: 3,
        format: wgpu::VertexFormat::Float32x4,
    },
];

impl VertexLayout {
    /// Attributes in the order they are packed.
    pub fn attributes(self) -> &'static [Attribute] {
        match self {
            VertexLayout::Position => &[Attribute::Position],
            VertexLayout::PositionNormalColor => {
                &[Attribute::Position, Attribute::Normal, Attribute::Color]
            }
            VertexLayout::PositionNormalTexCoordColor => &[
                Attribute::Position,
                Attribute::Normal,
                Attribute::TexCoord,
                Attribute::Color,
            ],
        }
    }

    /// Matching wgpu attribute descriptors.
    pub fn wgpu_attributes(self) -> &'static [wgpu::VertexAttribute] {
        match self {
            VertexLayout::Position => &POSITION_ATTRIBUTES,
            VertexLayout::PositionNormalColor => &POSITION_NORMAL_COLOR_ATTRIBUTES,
            VertexLayout::PositionNormalTexCoordColor => {
                &POSITION_NORMAL_TEX_COORD_COLOR_ATTRIBUTES
            }
        }
    }

    /// Bytes per packed vertex.
    pub fn stride(self) -> u64 {
        self.attributes()
            .iter()
            .map(|a| a.format().size())
            .sum()
    }

    /// Input layout for the pipeline's single vertex buffer.
    pub fn buffer_layout(self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: self.wgpu_attributes(),
        }
    }

    /// Pack vertices into the byte stream this layout describes.
    pub fn pack(self, vertices: &[Vertex]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.stride() as usize * vertices.len());
        for vertex in vertices {
            for attribute in self.attributes() {
                bytes.extend_from_slice(bytemuck::cast_slice(attribute.components(vertex)));
            }
        }
        bytes
    }
}
