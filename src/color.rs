//! RGB colors for groups and styles
//!
//! Colors are written as `#rrggbb` strings in maps and config files. Parsing
//! also accepts the short `#rgb` form, with or without the leading '#'.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `#rgb`, `rrggbb` or `rgb`
    pub fn parse(input: &str) -> Option<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (channel, digit) in channels.iter_mut().zip(hex.chars()) {
                    let value = digit.to_digit(16)? as u8;
                    *channel = value * 17;
                }
                Some(Self::from(channels))
            }
            6 => {
                let value = u32::from_str_radix(hex, 16).ok()?;
                Some(Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
            }
            _ => None,
        }
    }

    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// RGBA bytes with the given alpha
    pub fn with_alpha(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// Color from a hue in degrees, full saturation, every channel mapped into
    /// the palette range
    fn from_hue(hue: f32) -> Self {
        let hue = hue.rem_euclid(360.0) / 60.0;
        let x = 1.0 - (hue % 2.0 - 1.0).abs();
        let (r, g, b) = match hue as u32 {
            0 => (1.0, x, 0.0),
            1 => (x, 1.0, 0.0),
            2 => (0.0, 1.0, x),
            3 => (0.0, x, 1.0),
            4 => (x, 0.0, 1.0),
            _ => (1.0, 0.0, x),
        };
        let span = (palette::CHANNEL_MAX - palette::CHANNEL_MIN) as f32;
        let channel = |v: f32| palette::CHANNEL_MIN + (v * span).round() as u8;
        Self::new(channel(r), channel(g), channel(b))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

/// Endless sequence of distinct group colors.
///
/// Consecutive colors are a golden angle apart in hue so neighbouring groups
/// stay distinguishable.
#[derive(Debug, Clone, Default)]
pub struct ColorCycle {
    step: u32,
}

impl ColorCycle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for ColorCycle {
    type Item = Rgb;

    fn next(&mut self) -> Option<Rgb> {
        self.step = self.step.wrapping_add(1);
        Some(Rgb::from_hue(self.step as f32 * palette::HUE_STEP))
    }
}
