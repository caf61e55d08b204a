//! Per-frame driver: advances the simulation clock and recomputes every
//! transform.
//!
//! Parameters are read from a [`ParameterStore`], so every frame sees validated
//! values.
//!
//! Two states, Running (initial) and Paused. While paused the clock is frozen,
//! but [`FrameDriver::recompute`] still produces a fresh snapshot so parameter
//! changes show up immediately. Resuming continues from the frozen time;
//! wall-clock time spent paused is never added.

use std::time::Instant;

use orrery_kinematics::{ParameterStore, SimulationClock, SolarSystem};
use orrery_lighting::LightDirector;
use serde::Serialize;
use tracing::{info, warn};

use crate::scene::{FrameSnapshot, MarkerStyle, SceneSetup};

/// Maximum frame time clamp. A long stall (debugger, suspended window) is
/// accepted as slowdown instead of a jump in the animation.
pub const DEFAULT_MAX_FRAME_TIME: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    Running,
    Paused,
}

/// Owns the clock and turns `(elapsed, parameters)` into [`FrameSnapshot`]s.
pub struct FrameDriver {
    clock: SimulationClock,
    system: SolarSystem,
    director: LightDirector,
    previous_time: Option<Instant>,
    /// Last `paused` flag read from the parameters; `None` before the first frame.
    last_paused_param: Option<bool>,
    max_frame_time: f64,
    frame_count: u64,
}

impl FrameDriver {
    /// Creates a running driver at `t = 0`.
    pub fn new(system: SolarSystem, director: LightDirector) -> Self {
        Self {
            clock: SimulationClock::new(),
            system,
            director,
            previous_time: None,
            last_paused_param: None,
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
            frame_count: 0,
        }
    }

    pub fn with_max_frame_time(mut self, max_frame_time: f64) -> Self {
        self.max_frame_time = max_frame_time;
        self
    }

    pub fn state(&self) -> DriverState {
        if self.clock.is_running() {
            DriverState::Running
        } else {
            DriverState::Paused
        }
    }

    /// Freezes the clock. No-op when already paused.
    pub fn pause(&mut self) {
        if self.state() == DriverState::Paused {
            return;
        }
        self.clock.stop();
        info!(
            "Paused at t={:.3}s",
            self.clock.elapsed_seconds()
        );
    }

    /// Resumes from the frozen time. No-op when already running.
    pub fn resume(&mut self) {
        if self.state() == DriverState::Running {
            return;
        }
        // Forget the last wall-clock sample so the pause is not counted.
        self.previous_time = None;
        self.clock.start();
        info!(
            "Resumed at t={:.3}s",
            self.clock.elapsed_seconds()
        );
    }

    /// Rewinds to `t = 0` keeping the current state.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.previous_time = None;
        info!("Simulation reset");
    }

    /// Runs one frame, measuring the wall-clock time since the previous tick.
    ///
    /// The first tick after construction or a resume uses a zero delta, so
    /// wall-clock time spent paused never reaches the clock.
    pub fn tick(&mut self, store: &ParameterStore) -> FrameSnapshot {
        // A resume edge must clear the last sample before it is measured.
        self.sync_paused_flag(store.parameters().paused);

        let now = Instant::now();
        let frame_time = self
            .previous_time
            .map(|prev| now.duration_since(prev).as_secs_f64())
            .unwrap_or(0.0);
        self.previous_time = Some(now);
        self.advance_frame(frame_time, store)
    }

    /// Runs one frame with an explicit delta in seconds.
    pub fn step(&mut self, frame_time: f64, store: &ParameterStore) -> FrameSnapshot {
        self.sync_paused_flag(store.parameters().paused);
        self.advance_frame(frame_time, store)
    }

    fn advance_frame(&mut self, frame_time: f64, store: &ParameterStore) -> FrameSnapshot {
        let mut frame_time = frame_time;
        if frame_time > self.max_frame_time {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                self.max_frame_time * 1000.0
            );
            frame_time = self.max_frame_time;
        }

        self.clock.advance(frame_time);
        self.frame_count += 1;
        self.recompute(store)
    }

    /// Rebuilds the snapshot at the current elapsed time without advancing.
    pub fn recompute(&self, store: &ParameterStore) -> FrameSnapshot {
        let params = store.parameters();
        let kinematics = self.system.evaluate(self.clock.elapsed_seconds(), params);
        let sun = kinematics.sun.position;
        FrameSnapshot {
            frame: self.frame_count,
            state: self.state(),
            earth_lights: self.director.aim(kinematics.earth.position, sun),
            moon_lights: self.director.aim(kinematics.moon.position, sun),
            kinematics,
            atmosphere_intensity: params.atmosphere_intensity,
            speed_label: params.speed_label(),
            markers: MarkerStyle::all_from(params),
        }
    }

    /// Static geometry for the current parameters.
    pub fn scene_setup(&self, store: &ParameterStore) -> SceneSetup {
        SceneSetup {
            landmarks: self.system.landmarks().to_vec(),
            earth_orbit_path: self.system.earth_orbit_path(),
            moon_orbit_path: self.system.moon_orbit_path(store.parameters()),
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.clock.elapsed_seconds()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    /// Follows edges of the `paused` parameter so explicit
    /// [`pause`](Self::pause)/[`resume`](Self::resume) calls are not overridden
    /// every frame.
    fn sync_paused_flag(&mut self, paused: bool) {
        let previous = self.last_paused_param.replace(paused);
        if previous == Some(paused) {
            return;
        }
        if paused {
            self.pause();
        } else if previous.is_some() {
            self.resume();
        }
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(SolarSystem::default(), LightDirector::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use orrery_kinematics::SimulationParameters;

    use super::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_initial_state_is_running() {
        let driver = FrameDriver::default();
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(driver.elapsed_seconds(), 0.0);
        assert_eq!(driver.frame_count(), 0);
    }

    #[test]
    fn test_step_advances_clock() {
        let mut driver = FrameDriver::default();
        let store = ParameterStore::new();
        for _ in 0..60 {
            driver.step(DT, &store);
        }
        assert!((driver.elapsed_seconds() - 1.0).abs() < 1e-9);
        assert_eq!(driver.frame_count(), 60);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut driver = FrameDriver::default();
        let store = ParameterStore::new();
        driver.step(0.1, &store);
        driver.pause();
        let frozen = driver.elapsed_seconds();
        driver.pause();
        assert_eq!(driver.elapsed_seconds(), frozen);
        assert_eq!(driver.state(), DriverState::Paused);
    }

    #[test]
    fn test_paused_steps_do_not_advance() {
        let mut driver = FrameDriver::default();
        let store = ParameterStore::new();
        driver.step(0.1, &store);
        driver.pause();
        for _ in 0..10 {
            let frame = driver.step(DT, &store);
            assert_eq!(frame.state, DriverState::Paused);
        }
        assert!((driver.elapsed_seconds() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_resume_continues_from_frozen_time() {
        let mut driver = FrameDriver::default();
        let store = ParameterStore::new();
        driver.step(0.2, &store);
        driver.pause();
        driver.step(0.2, &store);
        driver.resume();
        driver.step(0.1, &store);
        assert!((driver.elapsed_seconds() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_frame_time_is_clamped() {
        let mut driver = FrameDriver::default().with_max_frame_time(0.05);
        driver.step(10.0, &ParameterStore::new());
        assert!((driver.elapsed_seconds() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_paused_parameter_drives_state() {
        let mut driver = FrameDriver::default();
        let mut store = ParameterStore::new();
        driver.step(DT, &store);

        store.set_paused(true).unwrap();
        driver.step(DT, &store);
        assert_eq!(driver.state(), DriverState::Paused);
        let frozen = driver.elapsed_seconds();

        store.set_paused(false).unwrap();
        driver.step(DT, &store);
        assert_eq!(driver.state(), DriverState::Running);
        assert!((driver.elapsed_seconds() - frozen - DT).abs() < 1e-12);
    }

    #[test]
    fn test_tick_resume_from_parameter_ignores_idle_wall_time() {
        let mut driver = FrameDriver::default();
        let mut store = ParameterStore::new();
        driver.tick(&store);

        store.set_paused(true).unwrap();
        driver.tick(&store);
        let frozen = driver.elapsed_seconds();

        // Host stops requesting frames while paused.
        std::thread::sleep(Duration::from_millis(60));
        store.set_paused(false).unwrap();
        let resumed = driver.tick(&store);
        assert_eq!(resumed.state, DriverState::Running);
        assert_eq!(driver.elapsed_seconds(), frozen);

        // The sample taken on the resume frame is kept for the next delta.
        std::thread::sleep(Duration::from_millis(5));
        driver.tick(&store);
        assert!(driver.elapsed_seconds() > frozen);
    }

    #[test]
    fn test_explicit_pause_survives_unchanged_parameter() {
        let mut driver = FrameDriver::default();
        let store = ParameterStore::new();
        driver.step(DT, &store);
        driver.pause();
        driver.step(DT, &store);
        assert_eq!(driver.state(), DriverState::Paused);
    }

    #[test]
    fn test_start_paused_from_parameters() {
        let mut driver = FrameDriver::default();
        let store = ParameterStore::with_initial(SimulationParameters {
            paused: true,
            ..SimulationParameters::default()
        })
        .unwrap();
        driver.step(DT, &store);
        assert_eq!(driver.state(), DriverState::Paused);
        assert_eq!(driver.elapsed_seconds(), 0.0);
    }

    #[test]
    fn test_recompute_while_paused_reflects_new_parameters() {
        let mut driver = FrameDriver::default();
        let mut store = ParameterStore::new();
        driver.step(0.5, &store);
        driver.pause();

        let before = driver.recompute(&store);
        store.set_rotation_speed(40.0).unwrap();
        let after = driver.recompute(&store);

        assert_eq!(before.kinematics.elapsed_seconds, after.kinematics.elapsed_seconds);
        assert_ne!(before.kinematics.earth.position, after.kinematics.earth.position);
        assert_eq!(after.speed_label, "rotation sped up by 200.0 times");
    }

    #[test]
    fn test_reset_rewinds_clock() {
        let mut driver = FrameDriver::default();
        let store = ParameterStore::new();
        driver.step(0.2, &store);
        driver.reset();
        assert_eq!(driver.elapsed_seconds(), 0.0);
        let frame = driver.recompute(&store);
        assert_eq!(frame.kinematics.earth.position, glam::DVec3::new(-15.0, 0.0, 0.0));
    }

    #[test]
    fn test_lights_follow_bodies() {
        let mut driver = FrameDriver::default();
        let frame = driver.step(0.7, &ParameterStore::new());
        let k = &frame.kinematics;
        assert_eq!(frame.earth_lights.primary.target, k.earth.position);
        assert_eq!(frame.moon_lights.primary.target, k.moon.position);
        let expected = k.earth.position.normalize();
        assert!((frame.earth_lights.primary.direction() - expected).length() < 1e-9);
    }

    #[test]
    fn test_scene_setup_contains_static_geometry() {
        let driver = FrameDriver::default();
        let setup = driver.scene_setup(&ParameterStore::new());
        assert_eq!(setup.landmarks.len(), 4);
        assert_eq!(
            setup.earth_orbit_path.first(),
            setup.earth_orbit_path.last()
        );
        assert!(!setup.moon_orbit_path.is_empty());
    }
}
