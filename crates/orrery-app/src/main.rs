//! Headless orrery driver.
//!
//! Loads `config.ron` (created with defaults on first run), applies CLI
//! overrides, and steps the kinematics engine for a fixed number of frames.
//! Edits to `config.ron` are picked up once per simulated second.
//! Run with `cargo run -p orrery-app -- --frames 120 --json true` to dump frames.

use clap::Parser;
use orrery_app::platform::PlatformDirs;
use orrery_app::{
    AppError, ConfigWatcher, JsonLinesSink, LogSink, SceneSink, driver_from_config,
    parameter_store_from_config, run_headless,
};
use orrery_config::{CliArgs, Config};
use tracing::info;

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        eprintln!("orrery: {e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(dir) => PlatformDirs::from_config_dir(dir.clone()),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let on_disk = Config::load_or_create(&dirs.config_dir)?;
    let mut config = on_disk.clone();
    config.apply_cli_overrides(args);
    config.validate()?;

    orrery_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!("Config directory: {}", dirs.config_dir.display());

    let mut driver = driver_from_config(&config)?;
    let mut store = parameter_store_from_config(&config)?;
    let mut watcher = ConfigWatcher::new(dirs.config_dir.clone(), on_disk, args.clone());

    let setup = driver.scene_setup(&store);
    for landmark in &setup.landmarks {
        info!(
            "{:?} at angle {:.4} -> {:?}",
            landmark.landmark, landmark.angle, landmark.position
        );
    }

    let frame_time = 1.0 / f64::from(config.frame.target_fps);
    let mut sink: Box<dyn SceneSink> = if config.debug.json_frames {
        Box::new(JsonLinesSink::new(std::io::stdout().lock()))
    } else {
        Box::new(LogSink {
            summary_every: u64::from(config.frame.target_fps),
        })
    };

    let chunk = u64::from(config.frame.target_fps).max(1);
    let mut remaining = config.frame.frames;
    let mut elapsed = driver.elapsed_seconds();
    while remaining > 0 {
        let frames = remaining.min(chunk);
        elapsed = run_headless(&mut driver, &store, frames, frame_time, sink.as_mut());
        remaining -= frames;
        watcher.poll(&mut store);
    }

    let last = driver.recompute(&store);
    info!(
        "Finished {} frames, t={:.3}s, earth={:?}, moon={:?}",
        driver.frame_count(),
        elapsed,
        last.kinematics.earth.position,
        last.kinematics.moon.position
    );
    Ok(())
}
