//! Common imports for the demos.

pub use crate::app::Sample;
pub use crate::config::{CameraConfig, SampleConfig, Variant};
pub use crate::error::{ConfigError, RenderError};
pub use crate::math::{Mat4, Vec3};
