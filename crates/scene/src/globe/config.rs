use foundation::color::{Rgb, parse_hex};
use foundation::math::LatLng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Which dimensions drive the camera aspect and surface size on resize.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeBasis {
    /// Browser window inner size. The canvas is usually smaller than the
    /// window, so this can stretch the globe; kept as the default for parity
    /// with existing pages.
    #[default]
    Window,
    /// The canvas client area.
    Container,
}

/// Host-facing globe configuration.
///
/// `polygon_color` and the arc/ring animation fields (`arc_time`,
/// `arc_length`, `rings`, `max_rings`) are accepted and kept but nothing draws
/// country polygons, arc paths or pulse rings yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobeConfig {
    pub point_size: f64,
    pub globe_color: String,
    pub show_atmosphere: bool,
    pub atmosphere_color: String,
    pub atmosphere_altitude: f64,
    pub emissive: String,
    pub emissive_intensity: f64,
    pub shininess: f64,
    pub polygon_color: String,
    pub ambient_light: Option<String>,
    pub directional_left_light: Option<String>,
    pub directional_top_light: Option<String>,
    pub point_light: Option<String>,
    pub arc_time: f64,
    pub arc_length: f64,
    pub rings: u32,
    pub max_rings: u32,
    pub initial_position: Option<LatLng>,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
    pub resize_basis: ResizeBasis,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            point_size: 1.0,
            globe_color: "#1d072e".to_string(),
            show_atmosphere: true,
            atmosphere_color: "#ffffff".to_string(),
            atmosphere_altitude: 0.1,
            emissive: "#000000".to_string(),
            emissive_intensity: 0.1,
            shininess: 0.9,
            polygon_color: "rgba(255,255,255,0.7)".to_string(),
            ambient_light: None,
            directional_left_light: None,
            directional_top_light: None,
            point_light: None,
            arc_time: 2000.0,
            arc_length: 0.9,
            rings: 1,
            max_rings: 3,
            initial_position: None,
            auto_rotate: true,
            auto_rotate_speed: 1.0,
            resize_basis: ResizeBasis::Window,
        }
    }
}

/// Surface material derived from the config colors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeMaterial {
    pub base: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f64,
    pub shininess: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Atmosphere {
    pub color: Rgb,
    /// Shell thickness as a fraction of the globe radius.
    pub altitude: f64,
}

impl GlobeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("pointSize", self.point_size),
            ("atmosphereAltitude", self.atmosphere_altitude),
            ("emissiveIntensity", self.emissive_intensity),
            ("shininess", self.shininess),
            ("autoRotateSpeed", self.auto_rotate_speed),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        for (field, value) in [
            ("pointSize", self.point_size),
            ("atmosphereAltitude", self.atmosphere_altitude),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if let Some(pos) = self.initial_position {
            if !pos.is_finite() {
                return Err(ConfigError::NonFinite {
                    field: "initialPosition",
                });
            }
        }
        Ok(())
    }

    pub fn material(&self) -> GlobeMaterial {
        GlobeMaterial {
            base: resolve_color("globeColor", Some(&self.globe_color), Rgb::new(0x1d, 0x07, 0x2e)),
            emissive: resolve_color("emissive", Some(&self.emissive), Rgb::BLACK),
            emissive_intensity: self.emissive_intensity,
            shininess: self.shininess,
        }
    }

    pub fn atmosphere(&self) -> Option<Atmosphere> {
        self.show_atmosphere.then(|| Atmosphere {
            color: resolve_color("atmosphereColor", Some(&self.atmosphere_color), Rgb::WHITE),
            altitude: self.atmosphere_altitude,
        })
    }
}

/// Parses an optional hex color, falling back (with a warning) when the value
/// is malformed. A missing value silently takes the fallback.
pub fn resolve_color(field: &'static str, value: Option<&str>, fallback: Rgb) -> Rgb {
    let Some(value) = value else {
        return fallback;
    };
    parse_hex(value).unwrap_or_else(|err| {
        warn!(field, "{err}, using {fallback:?}");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::{GlobeConfig, ResizeBasis, resolve_color};
    use crate::error::ConfigError;
    use foundation::color::Rgb;
    use foundation::math::LatLng;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_overrides_merge_with_defaults() {
        let cfg = GlobeConfig::from_json(
            r##"{
                "globeColor": "#062056",
                "initialPosition": {"lat": 22.3193, "lng": 114.1694},
                "autoRotateSpeed": 0.5,
                "ambientLight": "#38bdf8",
                "resizeBasis": "container"
            }"##,
        )
        .unwrap();

        assert_eq!(cfg.point_size, 1.0);
        assert_eq!(cfg.max_rings, 3);
        assert_eq!(cfg.auto_rotate_speed, 0.5);
        assert_eq!(cfg.initial_position, Some(LatLng::new(22.3193, 114.1694)));
        assert_eq!(cfg.resize_basis, ResizeBasis::Container);
        assert_eq!(cfg.material().base, Rgb::new(0x06, 0x20, 0x56));
    }

    #[test]
    fn default_material_and_atmosphere() {
        let cfg = GlobeConfig::default();
        assert_eq!(cfg.material().base, Rgb::new(29, 7, 46));
        assert_eq!(cfg.material().emissive, Rgb::BLACK);
        let atmosphere = cfg.atmosphere().unwrap();
        assert_eq!(atmosphere.color, Rgb::WHITE);
        assert_eq!(atmosphere.altitude, 0.1);

        let hidden = GlobeConfig {
            show_atmosphere: false,
            ..GlobeConfig::default()
        };
        assert_eq!(hidden.atmosphere(), None);
    }

    #[test]
    fn malformed_colors_fall_back() {
        assert_eq!(resolve_color("x", Some("not-a-color"), Rgb::WHITE), Rgb::WHITE);
        assert_eq!(resolve_color("x", None, Rgb::BLACK), Rgb::BLACK);
        assert_eq!(resolve_color("x", Some("#f00"), Rgb::BLACK), Rgb::new(255, 0, 0));

        let cfg = GlobeConfig {
            globe_color: "rgb(1,2,3)".to_string(),
            ..GlobeConfig::default()
        };
        assert_eq!(cfg.material().base, Rgb::new(29, 7, 46));
    }

    #[test]
    fn validation_rejects_non_finite_and_negative_values() {
        let cfg = GlobeConfig {
            point_size: -1.0,
            ..GlobeConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Negative { field: "pointSize", .. })
        ));

        let cfg = GlobeConfig {
            shininess: f64::NAN,
            ..GlobeConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonFinite { field: "shininess" })
        ));

        assert!(GlobeConfig::default().validate().is_ok());
    }
}
