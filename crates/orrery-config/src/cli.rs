//! Command-line argument parsing for the orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "orrery", about = "Sun-Earth-Moon kinematics driver")]
pub struct CliArgs {
    /// Earth rotation speed multiplier (0 - 200).
    #[arg(long)]
    pub rotation_speed: Option<f64>,

    /// Moon orbital inclination in degrees (0 - 10).
    #[arg(long)]
    pub moon_inclination: Option<f64>,

    /// Start with the clock paused.
    #[arg(long)]
    pub paused: Option<bool>,

    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Simulated frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Print every frame as a JSON line.
    #[arg(long)]
    pub json: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(speed) = args.rotation_speed {
            self.simulation.rotation_speed = speed;
        }
        if let Some(incl) = args.moon_inclination {
            self.simulation.moon_orbit_inclination_deg = incl;
        }
        if let Some(paused) = args.paused {
            self.simulation.start_paused = paused;
        }
        if let Some(frames) = args.frames {
            self.frame.frames = frames;
        }
        if let Some(fps) = args.fps {
            self.frame.target_fps = fps;
        }
        if let Some(json) = args.json {
            self.debug.json_frames = json;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
