//! Launch configuration.
//!
//! [`SampleConfig`] holds everything fixed at launch: window title and size,
//! vsync, which sample [`Variant`] to run, the texture path, background
//! color, and camera parameters. Defaults reproduce the stock sample; a JSON
//! file can override any subset of fields. A demo overlays the file on its
//! own variant's defaults, so fields the file leaves out (including
//! `variant` and `title`) stay as the demo set them.
//!
//! ```json
//! { "variant": "color_cube", "width": 1024, "camera": { "fov_y_radians": 1.0 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::Vec3;

/// Which sample to run. Each variant picks a vertex layout, a light count,
/// and whether a texture is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Position-only triangle, no lights, no camera.
    Triangle,
    /// Rotating cube with position, normal, and color; one orbiting light.
    ColorCube,
    /// Rotating textured cube with two orbiting lights.
    #[default]
    TexturedCube,
}

impl Variant {
    /// Number of orbiting lights the variant animates and draws.
    pub fn light_count(self) -> usize {
        match self {
            Variant::Triangle => 0,
            Variant::ColorCube => 1,
            Variant::TexturedCube => 2,
        }
    }

    /// Whether the variant samples a texture.
    pub fn textured(self) -> bool {
        matches!(self, Variant::TexturedCube)
    }

    /// Default window title.
    pub fn title(self) -> &'static str {
        match self {
            Variant::Triangle => "orrery — triangle",
            Variant::ColorCube => "orrery — color cube",
            Variant::TexturedCube => "orrery — textured cube",
        }
    }

    /// Whether the variant draws through the viewer camera. The triangle is
    /// drawn straight in clip space.
    pub fn uses_camera(self) -> bool {
        !matches!(self, Variant::Triangle)
    }
}

/// Camera view and projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.5, 5.0),
            target: Vec3::ZERO,
            fov_y_radians: std::f32::consts::FRAC_PI_2,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Everything the host needs at launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Wait for vertical blank when presenting.
    pub vsync: bool,
    pub variant: Variant,
    /// Texture loaded by the textured variant, relative to the working directory.
    pub texture_path: PathBuf,
    /// Background color the frame is cleared to (linear RGBA).
    pub clear_color: [f64; 4],
    pub camera: CameraConfig,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            title: Variant::default().title().to_string(),
            width: 800,
            height: 600,
            vsync: true,
            variant: Variant::default(),
            texture_path: PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/seafloor.png"
            )),
            // Midnight blue.
            clear_color: [0.098, 0.098, 0.439, 1.0],
            camera: CameraConfig::default(),
        }
    }
}

impl SampleConfig {
    /// Default configuration for a given variant.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            title: variant.title().to_string(),
            variant,
            ..Self::default()
        }
    }

    /// Load and validate a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_over(path, &Self::default())
    }

    /// Load a JSON config file on top of `base`. Missing fields keep the
    /// value `base` has.
    pub fn load_over(path: impl AsRef<Path>, base: &Self) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_over(&contents, base)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config string on top of `base`. Nested objects such as
    /// `camera` merge field by field.
    pub fn from_json_over(json: &str, base: &Self) -> Result<Self, ConfigError> {
        let mut merged = serde_json::to_value(base)?;
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        merge_json(&mut merged, overrides);

        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file named by the first command-line argument on top of the
    /// defaults for `variant`, or use those defaults if there is no argument.
    pub fn from_args_or(variant: Variant) -> Result<Self, ConfigError> {
        let base = Self::for_variant(variant);
        match std::env::args_os().nth(1) {
            Some(path) => {
                log::info!("Loading config from '{}'", Path::new(&path).display());
                Self::load_over(path, &base)
            }
            None => Ok(base),
        }
    }

    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        let camera = &self.camera;
        if !(camera.fov_y_radians > 0.0 && camera.fov_y_radians < std::f32::consts::PI) {
            return Err(ConfigError::Invalid(format!(
                "fov_y_radians must be in (0, pi), got {}",
                camera.fov_y_radians
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if camera.eye == camera.target {
            return Err(ConfigError::Invalid("camera eye and target coincide".into()));
        }
        Ok(())
    }
}

/// Overwrite `base` with `overrides`, recursing into objects present in both.
fn merge_json(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge_json(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_sample() {
        let config = SampleConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert!(config.vsync);
        assert_eq!(config.variant, Variant::TexturedCube);
        assert_eq!(config.camera.eye, Vec3::new(0.0, 2.5, 5.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SampleConfig::from_json(
            r#"{ "variant": "color_cube", "width": 1024, "camera": { "near": 0.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.variant, Variant::ColorCube);
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 600);
        assert_eq!(config.camera.near, 0.5);
        assert_eq!(config.camera.far, 100.0);
    }

    #[test]
    fn default_survives_json() {
        let config = SampleConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SampleConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        let err = SampleConfig::from_json(r#"{ "height": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn inverted_clip_planes_are_rejected() {
        let err = SampleConfig::from_json(r#"{ "camera": { "near": 10.0, "far": 1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_variant_is_a_parse_error() {
        let err = SampleConfig::from_json(r#"{ "variant": "teapot" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn variant_light_counts() {
        assert_eq!(Variant::Triangle.light_count(), 0);
        assert_eq!(Variant::ColorCube.light_count(), 1);
        assert_eq!(Variant::TexturedCube.light_count(), 2);
        assert!(Variant::TexturedCube.textured());
        assert!(!Variant::ColorCube.textured());
        assert!(!Variant::Triangle.uses_camera());
    }

    #[test]
    fn partial_file_keeps_demo_variant() {
        let path = std::env::temp_dir().join(format!("orrery-partial-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "width": 1024 }"#).unwrap();

        let base = SampleConfig::for_variant(Variant::Triangle);
        let loaded = SampleConfig::load_over(&path, &base);
        std::fs::remove_file(&path).unwrap();

        let loaded = loaded.unwrap();
        assert_eq!(loaded.variant, Variant::Triangle);
        assert_eq!(loaded.title, Variant::Triangle.title());
        assert_eq!(loaded.width, 1024);
        assert_eq!(loaded.height, 600);
    }

    #[test]
    fn file_title_wins_over_demo_title() {
        let base = SampleConfig::for_variant(Variant::ColorCube);
        let config = SampleConfig::from_json_over(r#"{ "title": "my title" }"#, &base).unwrap();
        assert_eq!(config.title, "my title");
        assert_eq!(config.variant, Variant::ColorCube);
    }

    #[test]
    fn file_variant_wins_over_demo_variant() {
        let base = SampleConfig::for_variant(Variant::Triangle);
        let config = SampleConfig::from_json_over(r#"{ "variant": "color_cube" }"#, &base).unwrap();
        assert_eq!(config.variant, Variant::ColorCube);
    }

    #[test]
    fn nested_camera_fields_merge_over_base() {
        let mut base = SampleConfig::for_variant(Variant::ColorCube);
        base.camera.far = 50.0;
        let config =
            SampleConfig::from_json_over(r#"{ "camera": { "near": 0.5 } }"#, &base).unwrap();
        assert_eq!(config.camera.near, 0.5);
        assert_eq!(config.camera.far, 50.0);
        assert_eq!(config.camera.eye, base.camera.eye);
    }

    #[test]
    fn overlay_is_still_validated() {
        let base = SampleConfig::for_variant(Variant::Triangle);
        let err = SampleConfig::from_json_over(r#"{ "width": 0 }"#, &base).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn each_variant_has_its_own_title() {
        assert_eq!(SampleConfig::for_variant(Variant::Triangle).title, "orrery — triangle");
        assert_eq!(SampleConfig::for_variant(Variant::ColorCube).title, "orrery — color cube");
        assert_eq!(SampleConfig::default().title, Variant::TexturedCube.title());
    }
}
