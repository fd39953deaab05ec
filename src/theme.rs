//! Type accent colours.

use ratatui::style::Color;

use crate::error::ColorError;

/// Opacity of the stat gauge track relative to the accent colour.
pub const TRACK_ALPHA: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let bad = || ColorError::BadHex(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(bad)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(bad());
        }
        let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).map_err(|_| bad());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    pub fn color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Black or white, whichever reads better on top of `self`.
    pub fn contrast(self) -> Color {
        let lum = 0.2126 * (self.r as f32) + 0.7152 * (self.g as f32) + 0.0722 * (self.b as f32);
        if lum > 160.0 {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl Rgba {
    /// CSS form, e.g. `rgba(120, 200, 80, 0.5)`.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Composite over an opaque background.
    pub fn over(&self, bg: Rgb) -> Rgb {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Rgb {
            r: mix(self.r, bg.r),
            g: mix(self.g, bg.g),
            b: mix(self.b, bg.b),
        }
    }
}

pub fn type_hex(name: &str) -> Option<&'static str> {
    let hex = match name {
        "normal" => "#A8A878",
        "fire" => "#F08030",
        "water" => "#6890F0",
        "electric" => "#F8D030",
        "grass" => "#78C850",
        "ice" => "#98D8D8",
        "fighting" => "#C03028",
        "poison" => "#A040A0",
        "ground" => "#E0C068",
        "flying" => "#A890F0",
        "psychic" => "#F85888",
        "bug" => "#A8B820",
        "rock" => "#B8A038",
        "ghost" => "#705898",
        "dragon" => "#7038F8",
        "dark" => "#705848",
        "steel" => "#B8B8D0",
        "fairy" => "#EE99AC",
        _ => return None,
    };
    Some(hex)
}

pub fn type_color(name: &str) -> Result<Rgb, ColorError> {
    let hex = type_hex(&name.to_lowercase()).ok_or_else(|| ColorError::UnknownType(name.to_string()))?;
    Rgb::from_hex(hex)
}

/// Badge colour for a type tag; unknown types get a neutral grey.
pub fn badge_color(name: &str) -> Rgb {
    type_color(name).unwrap_or(Rgb {
        r: 200,
        g: 200,
        b: 200,
    })
}
