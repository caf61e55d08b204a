//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level orrery configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Initial simulation parameters.
    pub simulation: SimulationConfig,
    /// Earth's heliocentric orbit.
    pub earth_orbit: OrbitConfig,
    /// The Moon's geocentric orbit.
    pub moon_orbit: OrbitConfig,
    /// Sunlight placement.
    pub lighting: LightingConfig,
    /// Frame pacing.
    pub frame: FrameConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Values the parameter store starts from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Earth spin multiplier (0 - 200).
    pub rotation_speed: f64,
    /// Atmosphere glow intensity (0 - 3).
    pub atmosphere_intensity: f64,
    /// Moon orbital inclination in degrees (0 - 10).
    pub moon_orbit_inclination_deg: f64,
    /// Start with the clock frozen.
    pub start_paused: bool,
}

/// Shape of a single-focus ellipse. Both fields are required when the section
/// is present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrbitConfig {
    /// Semi-major axis in world units.
    pub semi_major_axis: f64,
    /// Eccentricity in `[0, 1)`.
    pub eccentricity: f64,
}

/// Directional light configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Distance between each light and the body it aims at.
    pub standoff_distance: f64,
    /// Angle of the secondary fill light in radians.
    pub secondary_offset_rad: f64,
    /// Primary light intensity.
    pub primary_intensity: f32,
    /// Secondary light intensity.
    pub secondary_intensity: f32,
}

/// Frame pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    /// Frames per second the headless driver simulates.
    pub target_fps: u32,
    /// Longest frame delta accepted before clamping, in seconds.
    pub max_frame_time: f64,
    /// Frames to run in headless mode.
    pub frames: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Print each frame as a JSON line.
    pub json_frames: bool,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            earth_orbit: OrbitConfig {
                semi_major_axis: 20.0,
                eccentricity: 0.25,
            },
            moon_orbit: OrbitConfig {
                semi_major_axis: 3.0,
                eccentricity: 0.0549,
            },
            lighting: LightingConfig::default(),
            frame: FrameConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 1.0,
            atmosphere_intensity: 1.0,
            moon_orbit_inclination_deg: 5.1,
            start_paused: false,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            standoff_distance: 10.0,
            secondary_offset_rad: std::f64::consts::PI / 12.0,
            primary_intensity: 1.0,
            secondary_intensity: 0.35,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frame_time: 0.25,
            frames: 600,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_frames: false,
        }
    }
}

// --- Validation ---

impl Config {
    /// Checks values that would make the motion model degenerate.
    ///
    /// Parameter ranges (rotation speed, inclination, ...) are enforced by the
    /// parameter store when the config is applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, orbit) in [
            ("earth_orbit", &self.earth_orbit),
            ("moon_orbit", &self.moon_orbit),
        ] {
            if !(orbit.semi_major_axis.is_finite() && orbit.semi_major_axis > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!(
                        "semi_major_axis must be positive, got {}",
                        orbit.semi_major_axis
                    ),
                });
            }
            if !(0.0..1.0).contains(&orbit.eccentricity) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!(
                        "eccentricity must be in [0, 1), got {}",
                        orbit.eccentricity
                    ),
                });
            }
        }
        if self.frame.target_fps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "frame.target_fps",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.frame.max_frame_time.is_nan() || self.frame.max_frame_time <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "frame.max_frame_time",
                reason: format!("must be positive, got {}", self.frame.max_frame_time),
            });
        }
        if self.lighting.standoff_distance.is_nan() || self.lighting.standoff_distance <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "lighting.standoff_distance",
                reason: format!("must be positive, got {}", self.lighting.standoff_distance),
            });
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
