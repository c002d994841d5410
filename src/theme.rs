//! Colors shared by every component.
//!
//! Terminal cells have no alpha channel, so "translucent" fills are
//! blended over whatever color sits underneath.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::palette;

/// Backdrop the gradient fades from (the terminal "window" color).
pub const BASE: Rgb = Rgb::new(12, 18, 28);
/// Ambient surface color used for the content panel.
pub const SURFACE: Rgb = Rgb::new(20, 32, 46);
/// Emblem tint: white at 0x77 opacity.
pub const EMBLEM_TINT: Rgb = Rgb::new(255, 255, 255);
pub const EMBLEM_OPACITY: f32 = 0x77 as f32 / 255.0;
/// Background used before artwork-derived colors are known.
pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(96, 112, 128);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Paint `self` at `alpha` opacity over `under`.
    pub fn blend_over(self, under: Rgb, alpha: f32) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| -> u8 {
            (top as f32 * alpha + bottom as f32 * (1.0 - alpha)).round() as u8
        };
        Rgb::new(mix(self.r, under.r), mix(self.g, under.g), mix(self.b, under.b))
    }

    /// Relative luminance (WCAG 2.x).
    pub fn luminance(self) -> f32 {
        fn channel(value: u8) -> f32 {
            let c = value as f32 / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Reads back an RGB cell color; indexed/named colors yield `None`.
    pub fn from_color(color: Color) -> Option<Rgb> {
        match color {
            Color::Rgb(r, g, b) => Some(Rgb::new(r, g, b)),
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid color {0:?}, expected #RRGGBB")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let hex = input.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(input.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(input.to_string()))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// The (background, on-background) pair the screen is themed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ThemeColors {
    pub background: Rgb,
    pub on_background: Rgb,
}

impl ThemeColors {
    pub fn new(background: Rgb, on_background: Rgb) -> Self {
        Self {
            background,
            on_background,
        }
    }

    /// Pairs `background` with whichever of black/white reads better on it.
    pub fn from_background(background: Rgb) -> Self {
        Self::new(background, palette::on_color_for(background))
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::from_background(DEFAULT_BACKGROUND)
    }
}
