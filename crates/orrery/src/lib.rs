//! # Orrery — Minimal wgpu Sample Renderer
//!
//! Three small samples share one renderer: a position-only triangle, a
//! vertex-colored cube lit by one orbiting light, and a textured cube lit by
//! two. Each is selected by a [`Variant`](config::Variant) and differs only in
//! vertex layout, light count, and whether a texture is bound.
//!
//! The [`FrameRenderer`](render::FrameRenderer) exposes three lifecycle hooks
//! (create, update scene, render frame) and the [`host`] drives them from a
//! winit event loop. Start with `use orrery::prelude::*` and run a
//! [`Sample`](app::Sample).

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod host;
pub mod math;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod time;

#[cfg(feature = "hot-reload")]
pub mod asset;
