use foundation::color::Rgb;
use foundation::math::Vec3;

use super::config::{GlobeConfig, resolve_color};

pub const AMBIENT_INTENSITY: f64 = 0.6;
pub const POINT_INTENSITY: f64 = 0.8;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f64,
}

/// Light shining from `position` towards the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub position: Vec3,
    pub intensity: f64,
}

impl DirectionalLight {
    /// Unit vector from a surface point towards the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalized()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub color: Rgb,
    pub position: Vec3,
    pub intensity: f64,
}

/// The fixed four-light rig around the globe, colored from config.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeLights {
    pub ambient: AmbientLight,
    pub directional_left: DirectionalLight,
    pub directional_top: DirectionalLight,
    pub point: PointLight,
}

impl GlobeLights {
    pub fn from_config(config: &GlobeConfig) -> Self {
        let color = |field, value: &Option<String>| resolve_color(field, value.as_deref(), Rgb::WHITE);
        Self {
            ambient: AmbientLight {
                color: color("ambientLight", &config.ambient_light),
                intensity: AMBIENT_INTENSITY,
            },
            directional_left: DirectionalLight {
                color: color("directionalLeftLight", &config.directional_left_light),
                position: Vec3::new(-400.0, 100.0, 400.0),
                intensity: 1.0,
            },
            directional_top: DirectionalLight {
                color: color("directionalTopLight", &config.directional_top_light),
                position: Vec3::new(-200.0, 500.0, 200.0),
                intensity: 1.0,
            },
            point: PointLight {
                color: color("pointLight", &config.point_light),
                position: Vec3::new(-200.0, 500.0, 200.0),
                intensity: POINT_INTENSITY,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GlobeLights;
    use crate::globe::config::GlobeConfig;
    use foundation::color::Rgb;
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;

    #[test]
    fn rig_uses_config_colors() {
        let config = GlobeConfig {
            ambient_light: Some("#38bdf8".to_string()),
            directional_left_light: Some("#ffffff".to_string()),
            directional_top_light: Some("#ffffff".to_string()),
            point_light: Some("#ffffff".to_string()),
            ..GlobeConfig::default()
        };
        let lights = GlobeLights::from_config(&config);
        assert_eq!(lights.ambient.color, Rgb::new(0x38, 0xbd, 0xf8));
        assert_eq!(lights.ambient.intensity, 0.6);
        assert_eq!(lights.directional_left.position, Vec3::new(-400.0, 100.0, 400.0));
        assert_eq!(lights.point.position, lights.directional_top.position);
        assert_eq!(lights.point.intensity, 0.8);
    }

    #[test]
    fn missing_or_bad_colors_are_white() {
        let config = GlobeConfig {
            point_light: Some("nope".to_string()),
            ..GlobeConfig::default()
        };
        let lights = GlobeLights::from_config(&config);
        assert_eq!(lights.ambient.color, Rgb::WHITE);
        assert_eq!(lights.point.color, Rgb::WHITE);
    }

    #[test]
    fn directional_light_points_from_its_position() {
        let lights = GlobeLights::from_config(&GlobeConfig::default());
        let d = lights.directional_top.direction();
        assert!((d.length() - 1.0).abs() < 1e-12);
        assert!(d.y > 0.0);
    }
}
