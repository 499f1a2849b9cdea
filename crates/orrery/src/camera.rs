//! Viewer camera.
//!
//! A fixed camera that looks from an eye point at a target. It owns the view
//! and projection matrices the renderer combines with each object transform.
//! The host updates the projection aspect whenever the swapchain is resized;
//! there is no input handling, so the view never moves on its own.
//!
//! Both matrices are left-handed (+Z points into the screen) with a `[0, 1]`
//! depth range, which is what wgpu expects and what the cube's clockwise
//! front-face winding is authored for.

use crate::config::CameraConfig;
use crate::math::{Mat4, Vec3};

/// View and projection parameters for the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerCamera {
    eye: Vec3,
    target: Vec3,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl ViewerCamera {
    /// Create a camera from launch parameters and the initial window size.
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: Vec3::ZERO,
            target: Vec3::Z,
            fov_y: 0.0,
            aspect: 1.0,
            near: 0.0,
            far: 0.0,
        };
        camera.set_view_params(config.eye, config.target);
        camera.set_proj_params(config.fov_y_radians, 1.0, config.near, config.far);
        camera.set_window(width, height);
        camera
    }

    /// Set where the camera is and what it looks at.
    pub fn set_view_params(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
    }

    /// Set the projection parameters.
    pub fn set_proj_params(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) {
        self.fov_y = fov_y;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
    }

    /// Track the back buffer size. Zero-sized windows (minimized) keep the
    /// previous aspect ratio.
    pub fn set_window(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.set_proj_params(self.fov_y, width as f32 / height as f32, self.near, self.far);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// World-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye, self.target, Vec3::Y)
    }

    /// View-to-clip matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, self.aspect, self.near, self.far)
    }
}
