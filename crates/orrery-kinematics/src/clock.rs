//! Monotonic simulation clock with pause/resume.

use tracing::warn;

/// Elapsed simulation time, advanced explicitly by the frame driver.
///
/// `elapsed_seconds` never decreases while running and is frozen while stopped.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationClock {
    elapsed_seconds: f64,
    running: bool,
}

impl SimulationClock {
    /// Creates a running clock at `t = 0`.
    pub fn new() -> Self {
        Self {
            elapsed_seconds: 0.0,
            running: true,
        }
    }

    /// Resumes time advancement from the frozen value.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Freezes the clock. Calling this on a stopped clock is a no-op.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances by `dt` seconds if running and returns the elapsed time.
    ///
    /// Negative or non-finite deltas are discarded.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if !self.running {
            return self.elapsed_seconds;
        }
        if !dt.is_finite() || dt < 0.0 {
            warn!("Discarding invalid clock delta {dt}");
            return self.elapsed_seconds;
        }
        self.elapsed_seconds += dt;
        self.elapsed_seconds
    }

    /// Rewinds to `t = 0` without changing the running state.
    pub fn reset(&mut self) {
        self.elapsed_seconds = 0.0;
    }

    /// Returns the elapsed simulation time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Returns `true` while time is advancing.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_is_running_at_zero() {
        let clock = SimulationClock::new();
        assert!(clock.is_running());
        assert_eq!(clock.elapsed_seconds(), 0.0);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = SimulationClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert!((clock.elapsed_seconds() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_stopped_clock_is_frozen() {
        let mut clock = SimulationClock::new();
        clock.advance(2.0);
        clock.stop();
        clock.advance(10.0);
        assert_eq!(clock.elapsed_seconds(), 2.0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = SimulationClock::new();
        clock.advance(1.5);
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed_seconds(), 1.5);
    }

    #[test]
    fn test_restart_continues_from_frozen_value() {
        let mut clock = SimulationClock::new();
        clock.advance(3.0);
        clock.stop();
        clock.advance(100.0);
        clock.start();
        clock.advance(1.0);
        assert!((clock.elapsed_seconds() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_deltas_are_discarded() {
        let mut clock = SimulationClock::new();
        clock.advance(1.0);
        clock.advance(-0.5);
        clock.advance(f64::NAN);
        clock.advance(f64::INFINITY);
        assert_eq!(clock.elapsed_seconds(), 1.0);
    }

    #[test]
    fn test_reset_keeps_running_state() {
        let mut clock = SimulationClock::new();
        clock.advance(5.0);
        clock.stop();
        clock.reset();
        assert_eq!(clock.elapsed_seconds(), 0.0);
        assert!(!clock.is_running());
    }
}
