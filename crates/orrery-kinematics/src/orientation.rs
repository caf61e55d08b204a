//! Body orientations: Sun spin, tilted Earth spin, tidally locked Moon.

use glam::{DQuat, DVec3};

use crate::orbit::{DAYS_PER_YEAR, normalize_angle};

/// Earth's axial tilt in radians (23.5 degrees).
pub const EARTH_AXIAL_TILT: f64 = 0.4102;

/// Cloud layer spin relative to the Earth surface.
pub const CLOUD_SPIN_FACTOR: f64 = 0.9;

/// Rotation speed at which the animation runs "unaccelerated".
pub const REFERENCE_ROTATION_SPEED: f64 = 0.2;

/// Solar spin rate at the reference rotation speed (25.38-day sidereal period).
pub const SUN_ROTATION_RATE: f64 = REFERENCE_ROTATION_SPEED / 25.38;

/// Earth spin in radians per second per unit of rotation speed.
pub const EARTH_SPIN_RATE: f64 = 1.0;

/// Sun spin in radians per second per unit of rotation speed, so the Sun
/// follows the Earth rotation slider.
pub const SUN_SPIN_RATE: f64 = SUN_ROTATION_RATE / REFERENCE_ROTATION_SPEED;

/// Earth spin and revolution rates, both driven by one speed multiplier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EarthRates {
    /// Spin rate in radians per second.
    pub spin: f64,
    /// Orbital rate in radians per second.
    pub orbit: f64,
}

impl EarthRates {
    pub fn from_multiplier(rotation_speed: f64) -> Self {
        let spin = EARTH_SPIN_RATE * rotation_speed;
        Self {
            spin,
            orbit: spin / DAYS_PER_YEAR,
        }
    }
}

/// Spin angle of a body about its own axis.
pub fn spin_angle(elapsed_seconds: f64, rate_base: f64, rotation_speed: f64) -> f64 {
    normalize_angle(elapsed_seconds * rate_base * rotation_speed)
}

/// `tilt * orbital phase * spin`.
///
/// The tilt is about the in-plane Z axis; phase and spin are about Y. With a
/// zero tilt and phase this is a plain spin about +Y.
pub fn tilted_orientation(axial_tilt: f64, orbital_angle: f64, spin_angle: f64) -> DQuat {
    DQuat::from_rotation_z(axial_tilt)
        * DQuat::from_rotation_y(orbital_angle)
        * DQuat::from_rotation_y(spin_angle)
}

/// Direction of a body's spin axis in world space.
pub fn spin_axis(axial_tilt: f64) -> DVec3 {
    DQuat::from_rotation_z(axial_tilt) * DVec3::Y
}

/// Shortest-arc rotation taking the body's local +Z onto the direction of its
/// orbital focus, so the same hemisphere always faces the focus.
///
/// Returns identity if the body sits exactly on the focus.
pub fn tidal_lock_orientation(body_position: DVec3, focus_position: DVec3) -> DQuat {
    match (focus_position - body_position).try_normalize() {
        Some(forward) => DQuat::from_rotation_arc(DVec3::Z, forward),
        None => DQuat::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;
    use crate::orbit::OrbitalElements;

    #[test]
    fn test_spin_to_orbit_ratio_holds() {
        for speed in [0.0, 0.2, 1.0, 7.5, 42.0, 200.0] {
            let rates = EarthRates::from_multiplier(speed);
            let diff = (rates.orbit * DAYS_PER_YEAR - rates.spin).abs();
            assert!(diff <= 1e-12 * speed.max(1.0), "speed={speed}, diff={diff}");
        }
    }

    #[test]
    fn test_spin_axis_is_tilted() {
        let axis = spin_axis(EARTH_AXIAL_TILT);
        assert!((axis.angle_between(DVec3::Y) - EARTH_AXIAL_TILT).abs() < 1e-12);
        assert!(axis.z.abs() < 1e-12);
        assert_eq!(spin_axis(0.0), DVec3::Y);
    }

    #[test]
    fn test_tilt_is_preserved_under_spin() {
        for i in 0..16 {
            let t = i as f64 * 0.37;
            let spin = spin_angle(t, EARTH_SPIN_RATE, 1.0);
            let q = tilted_orientation(EARTH_AXIAL_TILT, 1.1, spin);
            let axis = q * DVec3::Y;
            assert!((axis.angle_between(DVec3::Y) - EARTH_AXIAL_TILT).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sun_follows_rotation_slider() {
        let spin = spin_angle(10.0, SUN_SPIN_RATE, REFERENCE_ROTATION_SPEED);
        let angle = tilted_orientation(0.0, 0.0, spin).angle_between(DQuat::IDENTITY);
        assert!((angle - 10.0 * SUN_ROTATION_RATE).abs() < 1e-12);

        let fast_spin = spin_angle(10.0, SUN_SPIN_RATE, REFERENCE_ROTATION_SPEED * 2.0);
        assert!((fast_spin - 20.0 * SUN_ROTATION_RATE).abs() < 1e-12);
    }

    #[test]
    fn test_spin_angle_is_normalized() {
        let angle = spin_angle(100.0, EARTH_SPIN_RATE, 1.0);
        assert!((0.0..TAU).contains(&angle));
        assert!((angle - 100.0_f64.rem_euclid(TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_tidal_lock_faces_focus_over_revolution() {
        let orbit = OrbitalElements::moon();
        let earth = DVec3::new(-15.0, 0.0, 0.0);
        for i in 0..360 {
            let angle = TAU * i as f64 / 360.0;
            let moon = earth + orbit.position(angle);
            let q = tidal_lock_orientation(moon, earth);
            let forward = q * DVec3::Z;
            let error = forward.angle_between(earth - moon);
            assert!(error < 1e-4, "angle={angle}, error={error}");
        }
    }

    #[test]
    fn test_tidal_lock_handles_antiparallel_target() {
        let q = tidal_lock_orientation(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO);
        let forward = q * DVec3::Z;
        assert!((forward - DVec3::NEG_Z).length() < 1e-9);
    }

    #[test]
    fn test_tidal_lock_degenerate_is_identity() {
        assert_eq!(tidal_lock_orientation(DVec3::ONE, DVec3::ONE), DQuat::IDENTITY);
    }

    #[test]
    fn test_zero_speed_freezes_spin() {
        for t in [1.0, 100.0, 1e7] {
            assert_eq!(spin_angle(t, EARTH_SPIN_RATE, 0.0), 0.0);
            assert_eq!(spin_angle(t, SUN_SPIN_RATE, 0.0), 0.0);
        }
    }
}
