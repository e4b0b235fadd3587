use foundation::color::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of opacity levels the shader indexes into.
pub const OPACITY_SLOTS: usize = 10;
/// Number of palette entries the shader indexes into.
pub const COLOR_SLOTS: usize = 6;
/// Grid pitch in pixels; `dot_size` is interpreted relative to it.
pub const CELL_SIZE: f32 = 4.0;
pub const DEFAULT_DOT_SIZE: f32 = 2.0;

pub const DEFAULT_OPACITIES: [f32; OPACITY_SLOTS] =
    [0.3, 0.3, 0.3, 0.5, 0.5, 0.5, 0.8, 0.8, 0.8, 1.0];

/// Dark overlay color, fully opaque at the bottom edge.
pub const GRADIENT_COLOR: Rgb = Rgb::new(0x03, 0x07, 0x12);
/// Height fraction (from the bottom) at which the overlay is transparent.
pub const GRADIENT_STOP: f64 = 0.84;

/// CSS background of the overlay element.
pub fn gradient_css() -> String {
    let Rgb { r, g, b } = GRADIENT_COLOR;
    format!(
        "linear-gradient(to top, rgb({r}, {g}, {b}), transparent {}%)",
        GRADIENT_STOP * 100.0
    )
}

/// Overlay opacity at `from_bottom` (0 at the bottom edge, 1 at the top).
pub fn gradient_alpha(from_bottom: f64) -> f64 {
    (1.0 - from_bottom / GRADIENT_STOP).clamp(0.0, 1.0)
}

/// Host-facing reveal configuration, as received from the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevealConfig {
    /// Accepted for API compatibility; time always advances by the fixed step.
    pub animation_speed: f64,
    pub opacities: Vec<f32>,
    /// RGB triples, 0–255 per channel.
    pub colors: Vec<[f64; 3]>,
    pub container_class_name: Option<String>,
    pub dot_size: Option<f32>,
    pub show_gradient: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            animation_speed: 0.4,
            opacities: DEFAULT_OPACITIES.to_vec(),
            colors: vec![[0.0, 255.0, 255.0]],
            container_class_name: None,
            dot_size: None,
            show_gradient: true,
        }
    }
}

/// Validated shader parameters with palettes expanded to their fixed slots.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealParams {
    pub opacities: [f32; OPACITY_SLOTS],
    pub colors: [[f32; 3]; COLOR_SLOTS],
    pub total_size: f32,
    pub dot_size: f32,
}

impl RevealConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<RevealParams, ConfigError> {
        if self.opacities.is_empty() {
            return Err(ConfigError::Empty { field: "opacities" });
        }
        if self.opacities.len() > OPACITY_SLOTS {
            return Err(ConfigError::TooMany {
                field: "opacities",
                max: OPACITY_SLOTS,
                got: self.opacities.len(),
            });
        }
        if self.opacities.iter().any(|o| !o.is_finite()) {
            return Err(ConfigError::NonFinite { field: "opacities" });
        }

        if self.colors.is_empty() {
            return Err(ConfigError::Empty { field: "colors" });
        }
        if self.colors.len() > COLOR_SLOTS {
            return Err(ConfigError::TooMany {
                field: "colors",
                max: COLOR_SLOTS,
                got: self.colors.len(),
            });
        }
        let mut normalized = Vec::with_capacity(self.colors.len());
        for (index, rgb) in self.colors.iter().enumerate() {
            let mut out = [0.0f32; 3];
            for (slot, &value) in out.iter_mut().zip(rgb) {
                if !(0.0..=255.0).contains(&value) {
                    return Err(ConfigError::ChannelOutOfRange { index, value });
                }
                *slot = (value / 255.0) as f32;
            }
            normalized.push(out);
        }

        let dot_size = self.dot_size.unwrap_or(DEFAULT_DOT_SIZE);
        if !dot_size.is_finite() {
            return Err(ConfigError::NonFinite { field: "dotSize" });
        }
        if dot_size < 0.0 {
            return Err(ConfigError::Negative {
                field: "dotSize",
                value: f64::from(dot_size),
            });
        }

        Ok(RevealParams {
            opacities: stretch(&self.opacities),
            colors: stretch(&normalized),
            total_size: CELL_SIZE,
            dot_size,
        })
    }

    /// Classes for the wrapper element, base classes first.
    pub fn container_classes(&self) -> String {
        match self.container_class_name.as_deref().map(str::trim) {
            Some(extra) if !extra.is_empty() => format!("h-full relative bg-white w-full {extra}"),
            _ => "h-full relative bg-white w-full".to_string(),
        }
    }
}

/// Spreads `values` evenly over `N` slots, preserving order.
///
/// Slot `i` takes `values[i * len / N]`, so one color fills every slot and two
/// colors split the slots in half.
fn stretch<T: Copy + Default, const N: usize>(values: &[T]) -> [T; N] {
    let mut out = [T::default(); N];
    if values.is_empty() {
        return out;
    }
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = values[i * values.len() / N];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        CELL_SIZE, DEFAULT_OPACITIES, RevealConfig, gradient_alpha, gradient_css, stretch,
    };
    use crate::error::ConfigError;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_component_defaults() {
        let params = RevealConfig::default().validate().unwrap();
        assert_eq!(params.opacities, DEFAULT_OPACITIES);
        assert_eq!(params.colors, [[0.0, 1.0, 1.0]; 6]);
        assert_eq!(params.total_size, CELL_SIZE);
        assert_eq!(params.dot_size, 2.0);
    }

    #[test]
    fn parses_camel_case_json_with_defaults() {
        let cfg = RevealConfig::from_json(
            r#"{"colors": [[255, 0, 0], [0, 0, 255]], "dotSize": 3, "showGradient": false}"#,
        )
        .unwrap();
        assert_eq!(cfg.dot_size, Some(3.0));
        assert!(!cfg.show_gradient);
        assert_eq!(cfg.opacities, DEFAULT_OPACITIES.to_vec());

        let params = cfg.validate().unwrap();
        assert_eq!(
            params.colors,
            [
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn stretches_palettes_in_order() {
        let three: [u8; 6] = stretch(&[1, 2, 3]);
        assert_eq!(three, [1, 1, 2, 2, 3, 3]);
        let four: [u8; 6] = stretch(&[1, 2, 3, 4]);
        assert_eq!(four, [1, 1, 2, 3, 3, 4]);
        let five: [u8; 10] = stretch(&[1, 2, 3, 4, 5]);
        assert_eq!(five, [1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);
        let full: [u8; 6] = stretch(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(full, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn rejects_bad_palettes() {
        let cfg = RevealConfig {
            colors: vec![],
            ..RevealConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Empty { field: "colors" })
        ));

        let cfg = RevealConfig {
            colors: vec![[0.0, 300.0, 0.0]],
            ..RevealConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ChannelOutOfRange { index: 0, .. })
        ));

        let cfg = RevealConfig {
            opacities: vec![0.5; 11],
            ..RevealConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TooMany { got: 11, .. })
        ));

        let cfg = RevealConfig {
            dot_size: Some(-1.0),
            ..RevealConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Negative { .. })));
    }

    #[test]
    fn container_classes_append_host_class() {
        let mut cfg = RevealConfig::default();
        assert_eq!(cfg.container_classes(), "h-full relative bg-white w-full");
        cfg.container_class_name = Some("bg-black".to_string());
        assert_eq!(
            cfg.container_classes(),
            "h-full relative bg-white w-full bg-black"
        );
    }

    #[test]
    fn gradient_fades_out_at_the_stop() {
        assert_eq!(
            gradient_css(),
            "linear-gradient(to top, rgb(3, 7, 18), transparent 84%)"
        );
        assert_eq!(gradient_alpha(0.0), 1.0);
        assert_eq!(gradient_alpha(0.42), 0.5);
        assert_eq!(gradient_alpha(0.84), 0.0);
        assert_eq!(gradient_alpha(1.0), 0.0);
    }
}
