use serde::{Deserialize, Serialize};

/// 8-bit sRGB color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn normalized(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// The color faded by `t`: `t = 0` is fully visible, `t = 1` fully faded.
    pub fn faded(self, t: f64) -> Rgba {
        Rgba {
            rgb: self,
            alpha: 1.0 - t.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    /// CSS `rgba(...)` notation.
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }

    pub fn to_f32_array(self) -> [f32; 4] {
        let [r, g, b] = self.rgb.normalized();
        [r, g, b, self.alpha as f32]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),
}

/// Parses `#rgb`, `rgb`, `#rrggbb` or `rrggbb` (case-insensitive).
///
/// Shorthand digits are doubled. Every other shape yields `None`.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex).as_bytes();
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }

    let expanded = match *digits {
        [r, g, b] => [r, r, g, g, b, b],
        [r0, r1, g0, g1, b0, b1] => [r0, r1, g0, g1, b0, b1],
        _ => return None,
    };

    let channel = |hi: u8, lo: u8| (hex_value(hi) << 4) | hex_value(lo);
    Some(Rgb::new(
        channel(expanded[0], expanded[1]),
        channel(expanded[2], expanded[3]),
        channel(expanded[4], expanded[5]),
    ))
}

/// Like [`hex_to_rgb`] but reports the rejected input.
pub fn parse_hex(hex: &str) -> Result<Rgb, ColorError> {
    hex_to_rgb(hex).ok_or_else(|| ColorError::InvalidHex(hex.to_string()))
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}
