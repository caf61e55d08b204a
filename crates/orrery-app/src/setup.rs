//! Builds the engine from a loaded [`Config`] and runs it headless.

use std::path::PathBuf;

use orrery_config::{CliArgs, Config, SimulationConfig};
use orrery_kinematics::{
    KinematicsError, OrbitalElements, ParamKey, ParamValue, ParameterStore, SimulationParameters,
    SolarSystem,
};
use orrery_lighting::LightDirector;
use tracing::{info, warn};

use crate::frame_driver::FrameDriver;
use crate::scene::SceneSink;

/// Errors surfaced by the binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] crate::platform::PlatformError),
    #[error(transparent)]
    Config(#[from] orrery_config::ConfigError),
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}

/// Validated orbits for the configured system.
pub fn solar_system_from_config(config: &Config) -> Result<SolarSystem, KinematicsError> {
    let earth = OrbitalElements::heliocentric(
        config.earth_orbit.semi_major_axis,
        config.earth_orbit.eccentricity,
    )?;
    let moon = OrbitalElements::geocentric(
        config.moon_orbit.semi_major_axis,
        config.moon_orbit.eccentricity,
    )?;
    Ok(SolarSystem::new(earth, moon))
}

pub fn light_director_from_config(config: &Config) -> LightDirector {
    LightDirector {
        standoff_distance: config.lighting.standoff_distance,
        secondary_offset: config.lighting.secondary_offset_rad,
        primary_intensity: config.lighting.primary_intensity,
        secondary_intensity: config.lighting.secondary_intensity,
        ..LightDirector::default()
    }
}

pub fn driver_from_config(config: &Config) -> Result<FrameDriver, KinematicsError> {
    Ok(FrameDriver::new(
        solar_system_from_config(config)?,
        light_director_from_config(config),
    )
    .with_max_frame_time(config.frame.max_frame_time))
}

/// Parameter store seeded with the configured initial values.
///
/// Out-of-range values are rejected exactly as a GUI edit would be.
pub fn parameter_store_from_config(config: &Config) -> Result<ParameterStore, KinematicsError> {
    let sim = &config.simulation;
    ParameterStore::with_initial(SimulationParameters {
        rotation_speed: sim.rotation_speed,
        paused: sim.start_paused,
        atmosphere_intensity: sim.atmosphere_intensity,
        moon_orbit_inclination_deg: sim.moon_orbit_inclination_deg,
        ..SimulationParameters::default()
    })
}

/// Steps the driver `frames` times at a fixed delta and feeds every snapshot
/// to `sink`. Returns the final elapsed time.
pub fn run_headless(
    driver: &mut FrameDriver,
    store: &ParameterStore,
    frames: u64,
    frame_time: f64,
    sink: &mut dyn SceneSink,
) -> f64 {
    info!(frames, frame_time, "Running headless");
    for _ in 0..frames {
        let snapshot = driver.step(frame_time, store);
        sink.apply(&snapshot);
    }
    driver.elapsed_seconds()
}

/// Pushes the live-tunable part of a config through the store, so the usual
/// validation and observers apply. `start_paused` only matters at startup and
/// is ignored. Returns how many parameters changed.
pub fn apply_simulation_config(
    store: &mut ParameterStore,
    sim: &SimulationConfig,
) -> Result<usize, KinematicsError> {
    let updates = [
        (ParamKey::RotationSpeed, sim.rotation_speed),
        (ParamKey::AtmosphereIntensity, sim.atmosphere_intensity),
        (ParamKey::MoonOrbitInclination, sim.moon_orbit_inclination_deg),
    ];
    let mut changed = 0;
    for (key, value) in updates {
        if store.set(key, ParamValue::Scalar(value))? {
            changed += 1;
        }
    }
    Ok(changed)
}

/// Polls `config.ron` for edits made while the orrery runs.
///
/// Compares against the file contents, not the effective config, so CLI
/// overrides do not register as changes. Overrides still win over the file.
pub struct ConfigWatcher {
    config_dir: PathBuf,
    on_disk: Config,
    overrides: CliArgs,
}

impl ConfigWatcher {
    pub fn new(config_dir: PathBuf, on_disk: Config, overrides: CliArgs) -> Self {
        Self {
            config_dir,
            on_disk,
            overrides,
        }
    }

    /// Applies any edit to `store`. Returns the number of parameters changed.
    ///
    /// Unreadable or invalid files are logged and skipped; the running
    /// parameters stay as they were.
    pub fn poll(&mut self, store: &mut ParameterStore) -> usize {
        let reloaded = match self.on_disk.reload(&self.config_dir) {
            Ok(Some(config)) => config,
            Ok(None) => return 0,
            Err(e) => {
                warn!("Config reload failed: {e}");
                return 0;
            }
        };

        let mut effective = reloaded.clone();
        effective.apply_cli_overrides(&self.overrides);
        self.on_disk = reloaded;

        match apply_simulation_config(store, &effective.simulation) {
            Ok(changed) => {
                info!(changed, "Applied reloaded config");
                changed
            }
            Err(e) => {
                warn!("Reloaded config rejected: {e}");
                0
            }
        }
    }
}
