//! Orrery application layer: the frame driver, the renderer seam, and
//! config-driven setup.

pub mod frame_driver;
pub mod platform;
pub mod scene;
pub mod setup;

pub use frame_driver::{DEFAULT_MAX_FRAME_TIME, DriverState, FrameDriver};
pub use scene::{
    FrameSnapshot, JsonLinesSink, LogSink, MarkerStyle, RecordingSink, SceneSetup, SceneSink,
};
pub use setup::{
    AppError, ConfigWatcher, apply_simulation_config, driver_from_config,
    light_director_from_config, parameter_store_from_config, run_headless,
    solar_system_from_config,
};
