use crate::error::{ForestError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB color, written as `#rrggbb`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
}

impl FromStr for Rgb {
    type Err = ForestError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ForestError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ForestError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Style parameters for one forest.
///
/// `mod1` is the branch angle in radians. `mod2`, `mod3`, `color1` and
/// `background` are part of the parameter set but do not shape the trees.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleConfig {
    pub width: u32,
    pub height: u32,
    pub mod1: f64,
    pub mod2: f64,
    pub mod3: f64,
    pub color1: Rgb,
    pub background: Rgb,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            mod1: 0.4,
            mod2: 0.1,
            mod3: 0.4,
            color1: Rgb::new(0xff, 0xf0, 0x00),
            background: Rgb::BLACK,
        }
    }
}

impl StyleConfig {
    /// Reject canvases with a zero side before any drawing happens.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ForestError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Configuration for the interactive terminal preview
#[derive(Clone, Debug)]
pub struct ViewConfig {
    pub hash: String,
    pub style: StyleConfig,
    pub angle_step: f64,
    pub show_status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_hex_colors() {
        let c: Rgb = "#fff000".parse().unwrap();
        assert_eq!(c, Rgb::new(255, 240, 0));
        assert_eq!(c.to_string(), "#fff000");
        assert_eq!("00FF00".parse::<Rgb>().unwrap(), Rgb::GREEN);
    }

    #[test]
    fn rejects_bad_colors() {
        assert!("#fff".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
    }

    #[test]
    fn zero_sized_canvas_is_invalid() {
        let style = StyleConfig { width: 0, ..StyleConfig::default() };
        assert!(matches!(
            style.validate(),
            Err(ForestError::InvalidDimensions { width: 0, height: 500 })
        ));
        assert!(StyleConfig::default().validate().is_ok());
    }
}
