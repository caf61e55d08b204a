//! Directional light: parallel rays aimed from a world position at a target.
//!
//! [`DirectionalLight`] is the CPU-side description produced each frame, while
//! [`DirectionalLightUniform`] is the packed form a renderer uploads.

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use serde::Serialize;

/// A directional light placed at `position` and aimed at `target`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectionalLight {
    pub position: DVec3,
    pub target: DVec3,
    /// Linear RGB color of the light (not premultiplied by intensity).
    pub color: glam::Vec3,
    /// Scalar intensity multiplier, `[0.0, ..)`.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: DVec3::Y,
            target: DVec3::ZERO,
            // Warm white, approximating D65 daylight.
            color: glam::Vec3::new(1.0, 0.96, 0.90),
            intensity: 1.0,
        }
    }
}

impl DirectionalLight {
    /// Normalized ray direction, from the light toward its target.
    ///
    /// Falls back to straight down if position and target coincide.
    pub fn direction(&self) -> DVec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(DVec3::NEG_Y)
    }

    /// Build the GPU-side uniform from this light's properties.
    pub fn to_uniform(&self) -> DirectionalLightUniform {
        let dir = self.direction().as_vec3();
        DirectionalLightUniform {
            direction_intensity: [dir.x, dir.y, dir.z, self.intensity],
            color_padding: [self.color.x, self.color.y, self.color.z, 0.0],
        }
    }
}

/// GPU-side representation, 32 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// xyz = direction (normalized), w = intensity.
    pub direction_intensity: [f32; 4],
    /// xyz = color (linear RGB), w = padding.
    pub color_padding: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_normalized() {
        let light = DirectionalLight {
            position: DVec3::new(3.0, -4.0, 12.0),
            ..DirectionalLight::default()
        };
        let len = light.direction().length();
        assert!((len - 1.0).abs() < 1e-12, "got {len}");
    }

    #[test]
    fn test_direction_points_at_target() {
        let light = DirectionalLight {
            position: DVec3::new(-10.0, 0.0, 0.0),
            target: DVec3::new(5.0, 0.0, 0.0),
            ..DirectionalLight::default()
        };
        assert_eq!(light.direction(), DVec3::X);
    }

    #[test]
    fn test_coincident_points_fall_back_downward() {
        let light = DirectionalLight {
            position: DVec3::ONE,
            target: DVec3::ONE,
            ..DirectionalLight::default()
        };
        assert_eq!(light.direction(), DVec3::NEG_Y);
    }

    #[test]
    fn test_uniform_buffer_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<DirectionalLightUniform>(), 32);
        assert_eq!(
            std::mem::offset_of!(DirectionalLightUniform, direction_intensity),
            0
        );
        assert_eq!(
            std::mem::offset_of!(DirectionalLightUniform, color_padding),
            16
        );
    }

    #[test]
    fn test_to_uniform_packs_correctly() {
        let light = DirectionalLight {
            position: DVec3::new(0.0, 2.0, 0.0),
            target: DVec3::ZERO,
            color: glam::Vec3::new(1.0, 0.5, 0.25),
            intensity: 2.0,
        };
        let u = light.to_uniform();
        assert!((u.direction_intensity[1] - (-1.0)).abs() < 1e-6);
        assert!((u.direction_intensity[3] - 2.0).abs() < 1e-6);
        assert!((u.color_padding[0] - 1.0).abs() < 1e-6);
        assert!((u.color_padding[1] - 0.5).abs() < 1e-6);
        assert!((u.color_padding[2] - 0.25).abs() < 1e-6);
        assert_eq!(u.color_padding[3], 0.0);
    }

    #[test]
    fn test_uniform_is_castable_to_bytes() {
        let light = DirectionalLight::default();
        let uniform = light.to_uniform();
        let bytes: &[u8] = bytemuck::bytes_of(&uniform);
        assert_eq!(bytes.len(), 32);
    }
}
