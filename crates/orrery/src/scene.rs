//! Scene state and the per-frame update.
//!
//! The scene is one spinning object plus up to two lights orbiting it. Every
//! value is a pure function of the absolute time, so the update keeps no
//! history and never touches the GPU:
//!
//! | Value   | Start       | Motion                              |
//! |---------|-------------|-------------------------------------|
//! | model   | identity    | rotation about +Y by `t`            |
//! | light 0 | `(0, 0, 1)` | rotation about +X by `-2t`          |
//! | light 1 | `(0, 0, -1)`| rotation about +Y by `-2t`          |
//!
//! Each light is also drawn as a small indicator cube at four times its
//! direction vector, scaled down to a quarter size.

use crate::math::{wrap_angle, Mat4, Quat, Transform, Vec3, Vec4};

/// Most lights any variant animates.
pub const MAX_LIGHTS: usize = 2;

/// Angular rate of the lights relative to the model rotation.
const LIGHT_ANGULAR_RATE: f64 = -2.0;

/// Distance of a light indicator from the origin.
const LIGHT_INDICATOR_DISTANCE: f32 = 4.0;

/// Uniform scale of a light indicator cube.
const LIGHT_INDICATOR_SCALE: f32 = 0.25;

/// Starting direction and rotation axis for each light slot.
const LIGHT_ORBITS: [(Vec3, Vec3); MAX_LIGHTS] = [
    (Vec3::Z, Vec3::X),
    (Vec3::NEG_Z, Vec3::Y),
];

/// Model transform and light directions for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    model: Mat4,
    lights: Vec<Vec3>,
    spins: bool,
}

impl SceneState {
    /// A scene at `t = 0` with `light_count` lights. `spins` is false for the
    /// triangle, whose model stays the identity.
    pub fn new(light_count: usize, spins: bool) -> Self {
        let light_count = light_count.min(MAX_LIGHTS);
        Self {
            model: Mat4::IDENTITY,
            lights: LIGHT_ORBITS[..light_count]
                .iter()
                .map(|(start, _)| *start)
                .collect(),
            spins,
        }
    }

    /// Advance the scene to absolute time `time` (seconds).
    ///
    /// `_delta` is accepted to match the host's frame-move signature; every
    /// value here is derived from absolute time alone.
    pub fn update(&mut self, time: f64, _delta: f32) {
        if self.spins {
            self.model = Transform::from_rotation_y(wrap_angle(time)).matrix();
        }

        let light_angle = wrap_angle(LIGHT_ANGULAR_RATE * time);
        for (light, (start, axis)) in self.lights.iter_mut().zip(LIGHT_ORBITS.iter()) {
            *light = Quat::from_axis_angle(*axis, light_angle) * *start;
        }
    }

    /// Current model matrix of the center object.
    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// Current light directions.
    pub fn lights(&self) -> &[Vec3] {
        &self.lights
    }

    /// Light directions packed for upload. Unused slots are zero.
    pub fn packed_lights(&self) -> [Vec4; MAX_LIGHTS] {
        let mut packed = [Vec4::ZERO; MAX_LIGHTS];
        for (slot, light) in packed.iter_mut().zip(&self.lights) {
            *slot = light.extend(1.0);
        }
        packed
    }
}

/// Object transform of the small cube that marks a light.
pub fn light_indicator_transform(direction: Vec3) -> Mat4 {
    Transform::from_translation(LIGHT_INDICATOR_DISTANCE * direction)
        .with_scale(LIGHT_INDICATOR_SCALE)
        .matrix()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    /// Recover the rotation angle about +Y from a pure Y rotation matrix.
    fn y_angle(m: Mat4) -> f32 {
        (-m.x_axis.z).atan2(m.x_axis.x)
    }

    fn same_angle(a: f32, b: f32) -> bool {
        let diff = (a - b).rem_euclid(std::f32::consts::TAU);
        diff < 1e-4 || (std::f32::consts::TAU - diff) < 1e-4
    }

    #[test]
    fn model_is_identity_at_zero() {
        let mut scene = SceneState::new(2, true);
        scene.update(0.0, 0.0);
        assert_eq!(scene.model(), Mat4::IDENTITY);
    }

    #[test]
    fn model_angle_tracks_time() {
        let mut scene = SceneState::new(2, true);
        for t in [0.25, 1.0, 3.0, 7.5, 100.0, 12345.678] {
            scene.update(t, 0.016);
            assert!(
                same_angle(y_angle(scene.model()), t.rem_euclid(std::f64::consts::TAU) as f32),
                "angle mismatch at t = {t}"
            );
        }
    }

    #[test]
    fn lights_start_on_z_axis() {
        let mut scene = SceneState::new(2, true);
        scene.update(0.0, 0.0);
        assert_eq!(scene.lights(), &[Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0)]);
    }

    #[test]
    fn lights_stay_unit_length() {
        let mut scene = SceneState::new(2, true);
        for i in 0..200 {
            scene.update(i as f64 * 0.173, 0.016);
            for light in scene.lights() {
                assert!((light.length() - 1.0).abs() < EPS, "length {}", light.length());
            }
        }
    }

    #[test]
    fn lights_orbit_at_twice_the_rate() {
        let mut scene = SceneState::new(2, true);
        // -2t = -pi/2
        scene.update(std::f64::consts::FRAC_PI_4, 0.0);
        assert!(scene.lights()[0].abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), EPS));
        assert!(scene.lights()[1].abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn light_count_is_clamped() {
        assert_eq!(SceneState::new(0, true).lights().len(), 0);
        assert_eq!(SceneState::new(1, true).lights().len(), 1);
        assert_eq!(SceneState::new(5, true).lights().len(), MAX_LIGHTS);
    }

    #[test]
    fn single_light_uses_first_orbit() {
        let mut scene = SceneState::new(1, true);
        scene.update(std::f64::consts::FRAC_PI_4, 0.0);
        assert!(scene.lights()[0].abs_diff_eq(Vec3::Y, EPS));
        let packed = scene.packed_lights();
        assert_eq!(packed[1], Vec4::ZERO);
        assert!((packed[0].w - 1.0).abs() < EPS);
    }

    #[test]
    fn static_scene_never_rotates() {
        let mut scene = SceneState::new(0, false);
        scene.update(2.0, 0.016);
        assert_eq!(scene.model(), Mat4::IDENTITY);
    }

    #[test]
    fn indicator_sits_four_units_out_at_quarter_scale() {
        let m = light_indicator_transform(Vec3::NEG_Z);
        let center = m.transform_point3(Vec3::ZERO);
        assert!(center.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), EPS));
        let corner = m.transform_point3(Vec3::ONE);
        assert!(corner.abs_diff_eq(Vec3::new(0.25, 0.25, -3.75), EPS));
    }
}
