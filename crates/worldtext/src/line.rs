//! Text line values and their rendered primitives

use serde::{Deserialize, Serialize};

use crate::geometry::{Angles, Vec3};
use crate::host::EntityHandle;

/// World units of vertical extent per point of font size
const FONT_HEIGHT_DIVISOR: f32 = 5.0;

/// RGBA color of a rendered text line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque yellow
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// Opaque cyan
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    /// Opaque red
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque orange
    pub const ORANGE: Self = Self::rgb(255, 165, 0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Opaque lime green
    pub const LIME: Self = Self::rgb(0, 255, 0);

    /// Create an opaque color from red/green/blue channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One line of a world text: content, color, and font size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLine {
    /// Displayed string
    pub text: String,
    /// Render color
    pub color: Color,
    /// Font size in points
    pub font_size: u32,
}

impl TextLine {
    /// Create a text line
    pub fn new(text: impl Into<String>, color: Color, font_size: u32) -> Self {
        Self {
            text: text.into(),
            color,
            font_size,
        }
    }

    /// Vertical extent of this line in world units, derived from font size
    pub fn height(&self) -> f32 {
        self.font_size as f32 / FONT_HEIGHT_DIVISOR
    }
}

/// One rendered text line positioned in the world
///
/// Owned exclusively by its parent multiline text. `entity` is `None`
/// until the line is spawned and is cleared again when it is destroyed.
#[derive(Debug, Clone)]
pub struct LinePrimitive {
    /// Line content this primitive renders
    pub line: TextLine,
    /// Absolute world position
    pub origin: Vec3,
    /// Absolute world rotation
    pub rotation: Angles,
    /// Handle to the host entity backing this line, if spawned
    pub entity: Option<EntityHandle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_height_scales_with_font_size() {
        let line = TextLine::new("hi", Color::WHITE, 24);
        assert_eq!(line.height(), 4.8);
        let line = TextLine::new("hi", Color::WHITE, 18);
        assert_eq!(line.height(), 3.6);
    }

    #[test]
    fn test_text_line_json_field_names() {
        let line = TextLine::new("hello", Color::YELLOW, 24);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["text"], "hello");
        assert_eq!(json["fontSize"], 24);
        assert_eq!(json["color"]["r"], 255);
        assert_eq!(json["color"]["a"], 255);
    }
}
