//! The Sun-Earth-Moon system and its per-frame evaluation.
//!
//! Every transform is re-derived from `(elapsed_seconds, parameters)`; nothing
//! accumulates between frames, so evaluation is a pure function.

use glam::{DQuat, DVec3};
use serde::Serialize;

use crate::orbit::{Landmark, OrbitalElements};
use crate::orientation::{
    CLOUD_SPIN_FACTOR, EARTH_AXIAL_TILT, EARTH_SPIN_RATE, SUN_SPIN_RATE, spin_angle, spin_axis,
    tidal_lock_orientation, tilted_orientation,
};
use crate::params::SimulationParameters;

/// Number of segments used when sampling orbit lines.
pub const ORBIT_PATH_SEGMENTS: usize = 256;

/// Half-length of the rendered Earth axis line, in world units.
pub const EARTH_AXIS_HALF_LENGTH: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyId {
    Sun,
    Earth,
    Moon,
}

/// Static description of a body.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    pub id: BodyId,
    /// `None` for the Sun, which sits at the origin.
    pub orbit: Option<OrbitalElements>,
    pub axial_tilt: f64,
    /// Spin rate per unit of rotation speed. Zero for tidally locked bodies.
    pub rotation_rate_base: f64,
}

impl CelestialBody {
    /// Tilted spin of the body at `orbital_angle`, with its spin rate scaled
    /// by `spin_factor` (1.0 for the surface, less for a cloud layer).
    pub fn spin_orientation(
        &self,
        elapsed_seconds: f64,
        orbital_angle: f64,
        rotation_speed: f64,
        spin_factor: f64,
    ) -> DQuat {
        let spin = spin_angle(
            elapsed_seconds,
            self.rotation_rate_base * spin_factor,
            rotation_speed,
        );
        tilted_orientation(self.axial_tilt, orbital_angle, spin)
    }

    /// Direction of the body's spin axis in world space.
    pub fn spin_axis(&self) -> DVec3 {
        spin_axis(self.axial_tilt)
    }
}

/// Position and orientation handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BodyTransform {
    pub id: BodyId,
    pub position: DVec3,
    pub orientation: DQuat,
}

/// Two endpoints of a line the renderer draws.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineSegment {
    pub start: DVec3,
    pub end: DVec3,
}

/// A fixed point on Earth's orbit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LandmarkPosition {
    pub landmark: Landmark,
    pub angle: f64,
    pub position: DVec3,
}

/// Everything the kinematics engine derives for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KinematicsFrame {
    pub elapsed_seconds: f64,
    pub earth_orbit_angle: f64,
    pub moon_orbit_angle: f64,
    pub sun: BodyTransform,
    pub earth: BodyTransform,
    /// Cloud layer: shares Earth's position, spins slower.
    pub clouds: BodyTransform,
    pub moon: BodyTransform,
    pub moon_link: LineSegment,
    pub earth_axis: LineSegment,
}

impl KinematicsFrame {
    pub fn bodies(&self) -> [BodyTransform; 3] {
        [self.sun, self.earth, self.moon]
    }
}

/// Sun at the origin, Earth around the Sun, Moon around Earth.
#[derive(Clone, Debug, PartialEq)]
pub struct SolarSystem {
    sun: CelestialBody,
    earth: CelestialBody,
    moon: CelestialBody,
    earth_orbit: OrbitalElements,
    moon_orbit: OrbitalElements,
    landmarks: Vec<LandmarkPosition>,
}

impl SolarSystem {
    pub fn new(earth_orbit: OrbitalElements, moon_orbit: OrbitalElements) -> Self {
        let landmarks = Landmark::ALL
            .into_iter()
            .map(|landmark| LandmarkPosition {
                landmark,
                angle: landmark.angle(),
                position: earth_orbit.position(landmark.angle()),
            })
            .collect();

        Self {
            sun: CelestialBody {
                id: BodyId::Sun,
                orbit: None,
                axial_tilt: 0.0,
                rotation_rate_base: SUN_SPIN_RATE,
            },
            earth: CelestialBody {
                id: BodyId::Earth,
                orbit: Some(earth_orbit),
                axial_tilt: EARTH_AXIAL_TILT,
                rotation_rate_base: EARTH_SPIN_RATE,
            },
            moon: CelestialBody {
                id: BodyId::Moon,
                orbit: Some(moon_orbit),
                axial_tilt: 0.0,
                rotation_rate_base: 0.0,
            },
            earth_orbit,
            moon_orbit,
            landmarks,
        }
    }

    pub fn body(&self, id: BodyId) -> &CelestialBody {
        match id {
            BodyId::Sun => &self.sun,
            BodyId::Earth => &self.earth,
            BodyId::Moon => &self.moon,
        }
    }

    pub fn earth_orbit(&self) -> OrbitalElements {
        self.earth_orbit
    }

    pub fn moon_orbit(&self) -> OrbitalElements {
        self.moon_orbit
    }

    /// Landmark positions, computed once at construction.
    pub fn landmarks(&self) -> &[LandmarkPosition] {
        &self.landmarks
    }

    /// Earth's orbit line around the Sun.
    pub fn earth_orbit_path(&self) -> Vec<DVec3> {
        self.earth_orbit().path(ORBIT_PATH_SEGMENTS)
    }

    /// The Moon's orbit line in its tilted local frame. Offset by Earth's
    /// current position to place it in the world.
    pub fn moon_orbit_path(&self, params: &SimulationParameters) -> Vec<DVec3> {
        let tilt = moon_plane_tilt(params);
        self.moon_orbit()
            .path(ORBIT_PATH_SEGMENTS)
            .into_iter()
            .map(|p| tilt * p)
            .collect()
    }

    /// Derives every transform at `elapsed_seconds`.
    pub fn evaluate(&self, elapsed_seconds: f64, params: &SimulationParameters) -> KinematicsFrame {
        let speed = params.rotation_speed;
        let earth_angle = self.earth_orbit.angle_at(elapsed_seconds, speed);
        let earth_position = self.earth_orbit.position(earth_angle);

        let moon_angle = self.moon_orbit.angle_at(elapsed_seconds, speed);
        let moon_position =
            earth_position + moon_plane_tilt(params) * self.moon_orbit.position(moon_angle);

        let axis = self.earth.spin_axis() * EARTH_AXIS_HALF_LENGTH;

        KinematicsFrame {
            elapsed_seconds,
            earth_orbit_angle: earth_angle,
            moon_orbit_angle: moon_angle,
            sun: BodyTransform {
                id: BodyId::Sun,
                position: DVec3::ZERO,
                orientation: self.sun.spin_orientation(elapsed_seconds, 0.0, speed, 1.0),
            },
            earth: BodyTransform {
                id: BodyId::Earth,
                position: earth_position,
                orientation: self.earth.spin_orientation(elapsed_seconds, earth_angle, speed, 1.0),
            },
            clouds: BodyTransform {
                id: BodyId::Earth,
                position: earth_position,
                orientation: self.earth.spin_orientation(
                    elapsed_seconds,
                    earth_angle,
                    speed,
                    CLOUD_SPIN_FACTOR,
                ),
            },
            moon: BodyTransform {
                id: BodyId::Moon,
                position: moon_position,
                orientation: tidal_lock_orientation(moon_position, earth_position),
            },
            moon_link: LineSegment {
                start: moon_position,
                end: earth_position,
            },
            earth_axis: LineSegment {
                start: earth_position - axis,
                end: earth_position + axis,
            },
        }
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new(OrbitalElements::earth(), OrbitalElements::moon())
    }
}

/// Tilts the Moon's orbital plane about the X axis (line of nodes).
fn moon_plane_tilt(params: &SimulationParameters) -> DQuat {
    DQuat::from_rotation_x(params.moon_orbit_inclination())
}
