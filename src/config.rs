//! Startup settings, read from a JSON file.
//!
//! Every field is optional in the file; missing fields take their defaults.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, DEFAULT_FOCAL_LENGTH, DEFAULT_RANGE};
use crate::engine::RenderMode;
use crate::light::{PointLight, DEFAULT_LIGHT_POWER};
use crate::math::vec3::Vec3;

pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub model_path: PathBuf,
    /// Uniform scale applied to every model vertex at load time.
    pub model_scale: f32,
    pub camera: CameraSettings,
    pub light: LightSettings,
    pub orbit_step_degrees: f32,
    /// Distance moved per key press, for both camera and light.
    pub move_step: f32,
    pub rotate_step_degrees: f32,
    pub export_path: PathBuf,
    pub texture_path: Option<PathBuf>,
    pub initial_mode: Option<RenderMode>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            model_path: PathBuf::from("cornell-box.obj"),
            model_scale: 0.35,
            camera: CameraSettings::default(),
            light: LightSettings::default(),
            orbit_step_degrees: 1.0,
            move_step: 0.1,
            rotate_step_degrees: 2.0,
            export_path: PathBuf::from("output.ppm"),
            texture_path: None,
            initial_mode: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub focal_length: f32,
    pub range: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 4.0],
            focal_length: DEFAULT_FOCAL_LENGTH,
            range: DEFAULT_RANGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub position: [f32; 3],
    pub power: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        let light = PointLight::default();
        Self {
            position: light.position.to_array(),
            power: DEFAULT_LIGHT_POWER,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults if the file is
    /// missing or can't be parsed.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("Settings file {:?} not found. Using default settings.", path);
                Settings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default settings.",
                    path, err
                );
                Settings::default()
            }
        }
    }

    fn from_json(contents: &str, path: &Path) -> Self {
        match serde_json::from_str::<Settings>(contents) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings.validate()
            }
            Err(err) => {
                warn!(
                    "Failed to parse {:?} ({}). Falling back to default settings.",
                    path, err
                );
                Settings::default()
            }
        }
    }

    fn validate(mut self) -> Self {
        let defaults = Settings::default();

        if self.width == 0 || self.height == 0 {
            warn!("Canvas size must be greater than zero. Using default size.");
            self.width = defaults.width;
            self.height = defaults.height;
        }

        if !(self.model_scale.is_finite() && self.model_scale > 0.0) {
            warn!("Model scale must be positive. Using default scale.");
            self.model_scale = defaults.model_scale;
        }

        if !(self.camera.focal_length.is_finite() && self.camera.focal_length > 0.0) {
            warn!("Focal length must be positive. Using default focal length.");
            self.camera.focal_length = DEFAULT_FOCAL_LENGTH;
        }

        if !(self.camera.range.is_finite() && self.camera.range > 0.0) {
            warn!("Projection range must be positive. Using default range.");
            self.camera.range = DEFAULT_RANGE;
        }

        if !self.light.power.is_finite() || self.light.power < 0.0 {
            warn!("Light power must be non-negative. Using default power.");
            self.light.power = DEFAULT_LIGHT_POWER;
        }

        self
    }

    /// Camera at the configured position, aimed at the origin.
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::new(
            Vec3::from_array(self.camera.position),
            self.camera.focal_length,
            self.camera.range,
            self.width,
            self.height,
        );
        camera.set_orbit_step(self.orbit_step_degrees.to_radians());
        camera.look_at(Vec3::ZERO);
        camera
    }

    pub fn light(&self) -> PointLight {
        PointLight::new(Vec3::from_array(self.light.position), self.light.power)
    }

    pub fn rotate_step(&self) -> f32 {
        self.rotate_step_degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_cornell_box_setup() {
        let settings = Settings::default();
        assert_eq!((settings.width, settings.height), (320, 240));
        assert_eq!(settings.camera.position, [0.0, 0.0, 4.0]);
        assert_eq!(settings.light.position, [0.0, 0.8, 0.0]);
        assert_eq!(settings.initial_mode, None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let json = r#"{ "width": 640, "light": { "power": 12.5 }, "initial_mode": "ray_traced" }"#;
        let settings = Settings::from_json(json, Path::new("inline.json"));
        assert_eq!(settings.width, 640);
        assert_eq!(settings.height, 240);
        assert_eq!(settings.light.power, 12.5);
        assert_eq!(settings.light.position, [0.0, 0.8, 0.0]);
        assert_eq!(settings.initial_mode, Some(RenderMode::RayTraced));
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let settings = Settings::from_json("{ width: ", Path::new("broken.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from_path("does/not/exist/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn invalid_values_are_clamped_to_defaults() {
        let json = r#"{ "width": 0, "model_scale": -1.0, "camera": { "focal_length": 0.0, "range": -5.0 } }"#;
        let settings = Settings::from_json(json, Path::new("bad.json"));
        assert_eq!((settings.width, settings.height), (320, 240));
        assert_relative_eq!(settings.model_scale, 0.35);
        assert_relative_eq!(settings.camera.focal_length, DEFAULT_FOCAL_LENGTH);
        assert_relative_eq!(settings.camera.range, DEFAULT_RANGE);
    }

    #[test]
    fn camera_is_aimed_at_origin() {
        let camera = Settings::default().camera();
        let centre = camera.project(Vec3::ZERO).unwrap();
        assert_relative_eq!(centre.x, 160.0, epsilon = 1e-4);
        assert_relative_eq!(centre.y, 120.0, epsilon = 1e-4);
        assert_relative_eq!(centre.depth, 4.0, epsilon = 1e-4);
    }
}
