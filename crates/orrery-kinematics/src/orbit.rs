//! Simplified Keplerian orbits: a single-focus ellipse in the XZ plane.
//!
//! The ellipse is evaluated directly from the polar conic equation. Angle 0 is
//! the perihelion on the -X axis and angle pi the aphelion on +X; landmark
//! markers are fixed angular offsets from these two points.

use std::f64::consts::{PI, TAU};

use glam::DVec3;
use serde::Serialize;

use crate::error::KinematicsError;

/// Ratio between Earth's spin rate and its orbital rate.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Sidereal month in days, used as the Moon's orbital rate divisor.
pub const DAYS_PER_SIDEREAL_MONTH: f64 = 27.32;

/// Angular distance (radians) between a solstice and the nearest orbital
/// extremum, roughly 13 days of a 365.25-day revolution.
pub const SOLSTICE_OFFSET: f64 = 0.226;

/// Orbital elements for a single-focus ellipse.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrbitalElements {
    semi_major_axis: f64,
    eccentricity: f64,
    angular_rate_base: f64,
}

impl OrbitalElements {
    /// Creates validated elements.
    ///
    /// `semi_major_axis` must be positive and `eccentricity` in `[0, 1)` so the
    /// orbit is a closed ellipse and the radius never reaches zero.
    /// `angular_rate_base` is radians per second per unit of speed multiplier.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        angular_rate_base: f64,
    ) -> Result<Self, KinematicsError> {
        if !(semi_major_axis.is_finite() && semi_major_axis > 0.0) {
            return Err(KinematicsError::invalid(
                "semi_major_axis",
                format!("must be positive and finite, got {semi_major_axis}"),
            ));
        }
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(KinematicsError::invalid(
                "eccentricity",
                format!("must be in [0, 1), got {eccentricity}"),
            ));
        }
        if !angular_rate_base.is_finite() {
            return Err(KinematicsError::invalid(
                "angular_rate_base",
                format!("must be finite, got {angular_rate_base}"),
            ));
        }
        Ok(Self {
            semi_major_axis,
            eccentricity,
            angular_rate_base,
        })
    }

    /// Earth's heliocentric orbit with the given shape.
    pub fn heliocentric(semi_major_axis: f64, eccentricity: f64) -> Result<Self, KinematicsError> {
        Self::new(semi_major_axis, eccentricity, 1.0 / DAYS_PER_YEAR)
    }

    /// The Moon's geocentric orbit with the given shape.
    pub fn geocentric(semi_major_axis: f64, eccentricity: f64) -> Result<Self, KinematicsError> {
        Self::new(semi_major_axis, eccentricity, 1.0 / DAYS_PER_SIDEREAL_MONTH)
    }

    /// Default Earth orbit: `a = 20`, `e = 0.25`.
    pub fn earth() -> Self {
        Self {
            semi_major_axis: 20.0,
            eccentricity: 0.25,
            angular_rate_base: 1.0 / DAYS_PER_YEAR,
        }
    }

    /// Default Moon orbit: `a = 3`, `e = 0.0549`.
    pub fn moon() -> Self {
        Self {
            semi_major_axis: 3.0,
            eccentricity: 0.0549,
            angular_rate_base: 1.0 / DAYS_PER_SIDEREAL_MONTH,
        }
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn angular_rate_base(&self) -> f64 {
        self.angular_rate_base
    }

    /// Distance from the focus at the given angle: `a(1 - e^2) / (1 + e cos(angle))`.
    pub fn radius_at(&self, angle: f64) -> f64 {
        let e = self.eccentricity;
        self.semi_major_axis * (1.0 - e * e) / (1.0 + e * angle.cos())
    }

    /// Focus-relative position at the given angle.
    pub fn position(&self, angle: f64) -> DVec3 {
        let r = self.radius_at(angle);
        DVec3::new(-r * angle.cos(), 0.0, r * angle.sin())
    }

    /// `a(1 - e)`, reached at angle 0.
    pub fn perihelion_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// `a(1 + e)`, reached at angle pi.
    pub fn aphelion_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Angle at `elapsed_seconds` for the given speed multiplier.
    pub fn angle_at(&self, elapsed_seconds: f64, speed_multiplier: f64) -> f64 {
        orbital_angle(elapsed_seconds, self.angular_rate_base, speed_multiplier)
    }

    /// Samples the closed ellipse as a line strip. The last point repeats the first.
    pub fn path(&self, segments: usize) -> Vec<DVec3> {
        let segments = segments.max(3);
        (0..=segments)
            .map(|i| {
                let angle = if i == segments {
                    0.0
                } else {
                    TAU * i as f64 / segments as f64
                };
                self.position(angle)
            })
            .collect()
    }
}

/// `elapsed * angular_rate_base * speed_multiplier`, normalized to `[0, 2pi)`.
pub fn orbital_angle(elapsed_seconds: f64, angular_rate_base: f64, speed_multiplier: f64) -> f64 {
    normalize_angle(elapsed_seconds * angular_rate_base * speed_multiplier)
}

/// Wraps an angle into `[0, 2pi)` to keep trigonometry well-conditioned over long runs.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Fixed reference points on Earth's orbit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Perihelion,
    Aphelion,
    WinterSolstice,
    SummerSolstice,
}

impl Landmark {
    pub const ALL: [Landmark; 4] = [
        Landmark::Perihelion,
        Landmark::Aphelion,
        Landmark::WinterSolstice,
        Landmark::SummerSolstice,
    ];

    /// Orbital angle of this landmark, independent of the orbit's shape.
    pub fn angle(self) -> f64 {
        match self {
            Landmark::Perihelion => 0.0,
            Landmark::Aphelion => PI,
            Landmark::WinterSolstice => 0.0 + SOLSTICE_OFFSET,
            Landmark::SummerSolstice => PI - SOLSTICE_OFFSET,
        }
    }
}
