//! Color palette shared by all charts.

use plotters::style::RGBColor;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid hex color '{0}', expected #rrggbb")]
pub struct ColorError(pub String);

pub const PALETTE_HEX: [&str; 7] = [
    "#bb3900", // Rust
    "#007cbf", // Blue
    "#d29900", // Ochre
    "#7cc300", // Lime
    "#c900ba", // Magenta
    "#318a6a", // Teal
    "#005c9d", // Navy
];

/// Default scatter color
pub const SCATTER_INDEX: usize = 1;
/// Default triple plot color
pub const TRIPLE_INDEX: usize = 2;

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(hex: &str) -> Result<RGBColor, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError(hex.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColorError(hex.to_string()))
    };
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Ordered list of colors; weekday `i` uses `colors[i % len]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<RGBColor>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: PALETTE_HEX
                .iter()
                .filter_map(|hex| parse_hex_color(hex).ok())
                .collect(),
        }
    }
}

impl Palette {
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, ColorError> {
        if hex.is_empty() {
            return Ok(Self::default());
        }
        let colors = hex
            .iter()
            .map(|h| parse_hex_color(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { colors })
    }

    pub fn get(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
