use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// sRGB color with components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed 0xRRGGBB value
    pub fn from_u32(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Parse `#rgb` or `#rrggbb`; the leading `#` is optional
    pub fn from_hex(value: &str) -> Result<Self, SceneError> {
        let invalid = || SceneError::InvalidColor(value.to_string());
        let digits = value.trim().trim_start_matches('#');

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let packed = match digits.len() {
            3 => {
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?
            }
            6 => u32::from_str_radix(digits, 16).map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };

        Ok(Self::from_u32(packed))
    }

    pub fn to_u32(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Linear-light components for shading on an sRGB surface
    pub fn to_linear(&self) -> [f32; 3] {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [decode(self.r), decode(self.g), decode(self.b)]
    }
}

impl Default for Color {
    /// Warm gold
    fn default() -> Self {
        Self::from_u32(0xffcc70)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_u32())
    }
}

impl FromStr for Color {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        let color = Color::from_hex("#ffcc70").unwrap();
        assert!((color.r - 1.0).abs() < 1e-6);
        assert!((color.g - 0.8).abs() < 1e-6);
        assert!((color.b - 112.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_short_hex_without_hash() {
        assert_eq!(Color::from_hex("fff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("#000").unwrap(), Color::BLACK);
    }

    #[test]
    fn test_reject_malformed() {
        for input in ["", "#ff", "#ffcc7", "#gggggg", "ffcc70ff", "#+fcc70"] {
            assert!(
                matches!(Color::from_hex(input), Err(SceneError::InvalidColor(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trips_hex() {
        assert_eq!(Color::default().to_string(), "#ffcc70");
        assert_eq!(Color::from_u32(0x1a2b3c).to_u32(), 0x1a2b3c);
    }

    #[test]
    fn test_linear_conversion_endpoints() {
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let white = Color::WHITE.to_linear();
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
        let mid = Color::rgb(0.5, 0.5, 0.5).to_linear();
        assert!((mid[0] - 0.214).abs() < 0.001);
    }
}
