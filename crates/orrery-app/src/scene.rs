//! The seam between the kinematics engine and whatever renderer owns the
//! scene graph.
//!
//! The driver emits immutable [`FrameSnapshot`] values; a [`SceneSink`] applies
//! them to its own objects. Nothing here touches GPU state.

use std::io::Write;

use glam::DVec3;
use orrery_kinematics::{KinematicsFrame, LandmarkPosition, Marker, SimulationParameters};
use orrery_lighting::LightPair;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::frame_driver::DriverState;

/// Visibility and color of one overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub marker: Marker,
    pub visible: bool,
    pub color: [f32; 3],
}

impl MarkerStyle {
    pub fn all_from(params: &SimulationParameters) -> Vec<MarkerStyle> {
        Marker::ALL
            .into_iter()
            .map(|marker| MarkerStyle {
                marker,
                visible: params.is_visible(marker),
                color: params.color(marker),
            })
            .collect()
    }
}

/// Geometry that only changes when parameters change: orbit lines and
/// landmark markers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneSetup {
    pub landmarks: Vec<LandmarkPosition>,
    /// Heliocentric line strip.
    pub earth_orbit_path: Vec<DVec3>,
    /// Line strip relative to Earth; offset by Earth's position each frame.
    pub moon_orbit_path: Vec<DVec3>,
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub state: DriverState,
    pub kinematics: KinematicsFrame,
    pub earth_lights: LightPair,
    pub moon_lights: LightPair,
    pub atmosphere_intensity: f64,
    /// GUI readout of the speed multiplier.
    pub speed_label: String,
    pub markers: Vec<MarkerStyle>,
}

/// Applies frames to a scene graph.
pub trait SceneSink {
    fn apply(&mut self, frame: &FrameSnapshot);
}

impl<F: FnMut(&FrameSnapshot)> SceneSink for F {
    fn apply(&mut self, frame: &FrameSnapshot) {
        self(frame)
    }
}

/// Keeps every frame it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<FrameSnapshot>,
}

impl SceneSink for RecordingSink {
    fn apply(&mut self, frame: &FrameSnapshot) {
        self.frames.push(frame.clone());
    }
}

/// Logs body positions; a summary line every `summary_every` frames.
#[derive(Debug)]
pub struct LogSink {
    pub summary_every: u64,
}

impl Default for LogSink {
    fn default() -> Self {
        Self { summary_every: 60 }
    }
}

impl SceneSink for LogSink {
    fn apply(&mut self, frame: &FrameSnapshot) {
        let k = &frame.kinematics;
        debug!(
            frame = frame.frame,
            t = k.elapsed_seconds,
            earth = ?k.earth.position,
            moon = ?k.moon.position,
            "Frame"
        );
        if self.summary_every > 0 && frame.frame % self.summary_every == 0 {
            info!(
                "t={:.2}s earth_angle={:.4} moon_angle={:.4} state={:?} ({})",
                k.elapsed_seconds,
                k.earth_orbit_angle,
                k.moon_orbit_angle,
                frame.state,
                frame.speed_label
            );
        }
    }
}

/// Writes one JSON object per frame.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    failures: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failures: 0,
        }
    }

    /// Frames that could not be written.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SceneSink for JsonLinesSink<W> {
    fn apply(&mut self, frame: &FrameSnapshot) {
        let result = serde_json::to_writer(&mut self.writer, frame)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(e) = result {
            self.failures += 1;
            warn!("Failed to write frame {}: {e}", frame.frame);
        }
    }
}
