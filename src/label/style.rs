//! Style primitives: colours, fonts and geometry
//!
//! Plain values that travel through `LabelOptions` and end up on every run
//! of a `StyledText`. Nothing here knows about rendering.

use serde::{Deserialize, Serialize};

use crate::label::error::LabelError;

// =============================================================================
// Color
// =============================================================================

/// 8-bit RGBA colour, (de)serialized as `#RRGGBB` / `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn from_hex(s: &str) -> Result<Self, LabelError> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(LabelError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| LabelError::InvalidColor(s.to_string()))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

// =============================================================================
// Font
// =============================================================================

/// Line height as a multiple of the point size when none is given
const DEFAULT_LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Font as the host understands it; the engine only reads `line_height`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    pub size: f32,
    /// Height of one line in points (used for default emoticon bounds)
    pub line_height: f32,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            line_height: size * DEFAULT_LINE_HEIGHT_FACTOR,
        }
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("system-ui", 17.0)
    }
}

// =============================================================================
// Geometry
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Square anchored at the origin
    pub fn square(side: f32) -> Self {
        Self::new(0.0, 0.0, side, side)
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

// =============================================================================
// Text styles
// =============================================================================

/// Style applied to the whole text before any link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontDescriptor,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontDescriptor::default(),
            color: Color::BLACK,
        }
    }
}

/// Global per-label link style, shared by every tappable span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkStyle {
    pub color: Color,
    pub underline: bool,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            underline: false,
        }
    }
}

/// Fully resolved style of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStyle {
    pub font: FontDescriptor,
    pub color: Color,
    pub underline: bool,
}

impl RunStyle {
    pub fn base(style: &TextStyle) -> Self {
        Self {
            font: style.font.clone(),
            color: style.color,
            underline: false,
        }
    }

    pub fn link(style: &TextStyle, link: &LinkStyle) -> Self {
        Self {
            font: style.font.clone(),
            color: link.color,
            underline: link.underline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_parse() {
        assert_eq!(Color::from_hex("#0000FF").unwrap(), Color::BLUE);
        assert_eq!(Color::from_hex("ff000080").unwrap(), Color::rgba(255, 0, 0, 128));
    }

    #[test]
    fn test_color_hex_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_color_serde_as_string() {
        let json = serde_json::to_string(&Color::rgba(1, 2, 3, 4)).unwrap();
        assert_eq!(json, "\"#01020304\"");
        let back: Color = serde_json::from_str("\"#010203\"").unwrap();
        assert_eq!(back, Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_font_default_line_height() {
        let font = FontDescriptor::new("Inter", 10.0);
        assert!((font.line_height - 12.0).abs() < 1e-4);
    }
}
