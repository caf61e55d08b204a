//! Orbital and rotational kinematics for a Sun-Earth-Moon orrery.
//!
//! Given elapsed simulation time and a [`SimulationParameters`] snapshot, the
//! engine derives every body's position and orientation. Evaluation is pure:
//! the same inputs always produce the same [`KinematicsFrame`].

mod clock;
mod error;
pub mod orbit;
pub mod orientation;
mod params;
mod system;

pub use clock::SimulationClock;
pub use error::KinematicsError;
pub use orbit::{Landmark, OrbitalElements, SOLSTICE_OFFSET, orbital_angle};
pub use orientation::{EARTH_AXIAL_TILT, EarthRates, REFERENCE_ROTATION_SPEED};
pub use params::{
    ATMOSPHERE_INTENSITY_RANGE, MOON_INCLINATION_RANGE, Marker, ParamChange, ParamKey,
    ParamValue, ParameterStore, ROTATION_SPEED_RANGE, SimulationParameters, SubscriptionId,
};
pub use system::{
    BodyId, BodyTransform, CelestialBody, KinematicsFrame, LandmarkPosition, LineSegment,
    SolarSystem,
};
