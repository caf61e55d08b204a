//! Re-aims per-body directional lights so sunlight always travels from the Sun
//! toward the lit body.

use std::f64::consts::PI;

use glam::{DQuat, DVec3};
use serde::Serialize;

use crate::DirectionalLight;

/// Angle between the primary and secondary light, softening the terminator.
pub const SECONDARY_OFFSET: f64 = PI / 12.0;

/// Distance between a light and the body it illuminates.
pub const DEFAULT_STANDOFF: f64 = 10.0;

/// Primary sunlight plus a slightly rotated fill light.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LightPair {
    pub primary: DirectionalLight,
    pub secondary: DirectionalLight,
}

/// Stateless light placement. Call [`aim`](Self::aim) every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LightDirector {
    pub standoff_distance: f64,
    /// Rotation of the secondary light about +Y, in radians.
    pub secondary_offset: f64,
    pub color: glam::Vec3,
    pub primary_intensity: f32,
    pub secondary_intensity: f32,
}

impl Default for LightDirector {
    fn default() -> Self {
        Self {
            standoff_distance: DEFAULT_STANDOFF,
            secondary_offset: SECONDARY_OFFSET,
            color: DirectionalLight::default().color,
            primary_intensity: 1.0,
            secondary_intensity: 0.35,
        }
    }
}

impl LightDirector {
    /// Places both lights `standoff_distance` behind `body` on the Sun side.
    ///
    /// If the body sits on the Sun the lights fall back to shining straight down.
    pub fn aim(&self, body: DVec3, sun: DVec3) -> LightPair {
        let outward = (body - sun).try_normalize().unwrap_or(DVec3::NEG_Y);
        let offset = outward * self.standoff_distance;
        let fill_offset = DQuat::from_rotation_y(self.secondary_offset) * offset;

        LightPair {
            primary: DirectionalLight {
                position: body - offset,
                target: body,
                color: self.color,
                intensity: self.primary_intensity,
            },
            secondary: DirectionalLight {
                position: body - fill_offset,
                target: body,
                color: self.color,
                intensity: self.secondary_intensity,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;

    #[test]
    fn test_primary_shines_from_sun_toward_body() {
        let director = LightDirector::default();
        for i in 0..36 {
            let angle = TAU * i as f64 / 36.0;
            let body = DVec3::new(-20.0 * angle.cos(), 0.0, 20.0 * angle.sin());
            let lights = director.aim(body, DVec3::ZERO);
            let expected = body.normalize();
            assert!((lights.primary.direction() - expected).length() < 1e-12);
            assert_eq!(lights.primary.target, body);
        }
    }

    #[test]
    fn test_standoff_distance() {
        let director = LightDirector {
            standoff_distance: 7.5,
            ..LightDirector::default()
        };
        let body = DVec3::new(12.0, 1.0, -3.0);
        let lights = director.aim(body, DVec3::new(1.0, 0.0, 0.0));
        assert!(((lights.primary.position - body).length() - 7.5).abs() < 1e-12);
        assert!(((lights.secondary.position - body).length() - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_sun_away_from_origin() {
        let director = LightDirector::default();
        let sun = DVec3::new(5.0, 0.0, 5.0);
        let body = DVec3::new(5.0, 0.0, -10.0);
        let lights = director.aim(body, sun);
        assert!((lights.primary.direction() - DVec3::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn test_secondary_is_offset_by_fixed_angle() {
        let director = LightDirector::default();
        let body = DVec3::new(-15.0, 0.0, 0.0);
        let lights = director.aim(body, DVec3::ZERO);
        let angle = lights
            .primary
            .direction()
            .angle_between(lights.secondary.direction());
        assert!((angle - PI / 12.0).abs() < 1e-9, "angle={angle}");
    }

    #[test]
    fn test_aim_is_stateless() {
        let director = LightDirector::default();
        let body = DVec3::new(3.0, 0.5, 9.0);
        assert_eq!(director.aim(body, DVec3::ZERO), director.aim(body, DVec3::ZERO));
    }

    #[test]
    fn test_body_on_sun_does_not_produce_nan() {
        let lights = LightDirector::default().aim(DVec3::ZERO, DVec3::ZERO);
        assert!(lights.primary.position.is_finite());
        assert!(lights.secondary.position.is_finite());
        assert_eq!(lights.primary.direction(), DVec3::NEG_Y);
    }
}
