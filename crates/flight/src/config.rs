//! Flight configuration (window, pacing, camera, light). Loaded from flight.ron at startup.

use glam::Vec3;
use renderer::CameraPose;
use serde::{Deserialize, Serialize};

/// Look-at parameters as plain arrays so the RON file stays readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub center: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = CameraPose::default();
        Self {
            eye: camera.eye.to_array(),
            center: camera.center.to_array(),
            up: camera.up.to_array(),
        }
    }
}

impl CameraConfig {
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(
            Vec3::from_array(self.eye),
            Vec3::from_array(self.center),
            Vec3::from_array(self.up),
        )
    }
}

/// Persistent flight settings. Loaded from `flight.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Frames per second the scene advances at. Stick deltas are per frame.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_light_position")]
    pub light_position: [f32; 3],
    /// Draw a marker where the light is.
    #[serde(default)]
    pub show_light_source: bool,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_frame_rate() -> f64 {
    60.0
}
fn default_light_position() -> [f32; 3] {
    [0.0, 40.0, 30.0]
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            frame_rate: default_frame_rate(),
            camera: CameraConfig::default(),
            light_position: default_light_position(),
            show_light_source: false,
        }
    }
}

impl FlightConfig {
    /// Load config from `flight.ron`. A missing file is created with defaults; an invalid one
    /// is left alone and defaults are used.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => {
                let config = Self::default();
                config.save();
                config
            }
        }
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `flight.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialise config: {}", e),
        }
    }

    pub fn light_position(&self) -> Vec3 {
        Vec3::from_array(self.light_position)
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("flight.ron")
}
