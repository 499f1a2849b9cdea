//! Math types and glam re-exports.
//!
//! All matrices are glam's column-vector `Mat4`. The [`Transform`] type builds
//! object matrices from translation, rotation, and scale.

pub use glam::{Mat4, Quat, Vec3, Vec4};

/// Reduce an absolute time in seconds to an angle in `[0, 2π)`.
///
/// The host clock is `f64` and grows without bound; rotating by `time as f32`
/// directly loses precision after a few hours. Reducing first keeps the
/// rotation smooth while leaving the angle equal to `time` modulo a full turn.
pub fn wrap_angle(time: f64) -> f32 {
    time.rem_euclid(std::f64::consts::TAU) as f32
}

/// A 3D transform: position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given position.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Create a transform rotated about the vertical axis.
    pub fn from_rotation_y(angle: f32) -> Self {
        Self {
            rotation: Quat::from_rotation_y(angle),
            ..Self::IDENTITY
        }
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Compute the 4x4 model matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_is_time_modulo_full_turn() {
        let tau = std::f64::consts::TAU;
        for t in [0.0, 0.5, 3.0, tau + 0.25, 1000.0, -1.0] {
            let expected = t.rem_euclid(tau);
            assert!((wrap_angle(t) as f64 - expected).abs() < 1e-5, "t = {t}");
        }
    }

    #[test]
    fn wrapped_rotation_matches_unwrapped() {
        let t = 12.75_f64;
        let a = Mat4::from_rotation_y(wrap_angle(t));
        let b = Mat4::from_rotation_y(t as f32);
        assert!(a.abs_diff_eq(b, 1e-5));
    }

    #[test]
    fn scale_applies_before_translation() {
        let m = Transform::from_translation(Vec3::new(0.0, 0.0, 4.0))
            .with_scale(0.25)
            .matrix();
        let p = m.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.abs_diff_eq(Vec3::new(0.25, 0.0, 4.0), 1e-6));
    }
}
