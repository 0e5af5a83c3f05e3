//! Style types for text rendering
//!
//! Colours come straight from configuration as `0xRRGGBB` integers, so the
//! palette is full 24-bit RGB rather than a fixed terminal palette.

use std::fmt;

use serde::Deserialize;

/// A 24-bit RGB colour
///
/// Deserializes from a packed `0xRRGGBB` integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "u32")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    /// Create a colour from its components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a colour from a packed `0xRRGGBB` value (upper byte ignored)
    pub const fn from_hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Pack back into `0xRRGGBB`
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Move each component towards white (or black, for light colours) by `amount`
    pub fn lift(self, amount: u8) -> Self {
        let luma = (self.r as u16 * 3 + self.g as u16 * 6 + self.b as u16) / 10;
        if luma > 0x80 {
            Self::rgb(
                self.r.saturating_sub(amount),
                self.g.saturating_sub(amount),
                self.b.saturating_sub(amount),
            )
        } else {
            Self::rgb(
                self.r.saturating_add(amount),
                self.g.saturating_add(amount),
                self.b.saturating_add(amount),
            )
        }
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self::from_hex(value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color (None keeps whatever is already painted)
    pub bg: Option<Color>,
    /// Bold text
    pub bold: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            bg: None,
            bold: false,
        }
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }
}
