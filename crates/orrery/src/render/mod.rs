//! Rendering subsystem — wgpu device, pipeline, and the frame renderer.

pub mod constants;
pub mod gpu;
pub mod mesh;
pub mod pass;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use constants::{FrameConstants, FrameConstantsStaging, PersistentConstants};
pub use gpu::GpuContext;
pub use mesh::Mesh;
pub use pass::{ClearColor, FrameContext};
pub use pipeline::PipelineConfig;
pub use renderer::{DrawItem, DrawKind, DrawPlan, FrameRenderer};
pub use vertex::{Attribute, Vertex, VertexLayout};
