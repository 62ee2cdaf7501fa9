//! Drawable primitives

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use image::RgbaImage;
use nalgebra::Point3;
use serde::Deserialize;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// Internal
use super::PaletteError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A drawable unit, in the local frame of its render request.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// A set of points of one color.
    Points {
        points: Arc<Vec<Point3<f64>>>,
        color: Color,

        /// Units: pixels
        size: f64,
    },

    /// A set of points, each colored between `from` and `to` by its weight
    /// in [0, 1].
    GradientPoints {
        points: Arc<Vec<Point3<f64>>>,
        weights: Vec<f64>,
        from: Color,
        to: Color,

        /// Units: pixels
        size: f64,
    },

    /// A line strip, or a loop if `closed`.
    Line {
        points: Vec<Point3<f64>>,
        color: Color,
        closed: bool,
    },

    /// A line strip colored at `weight` in [0, 1] between `from` and `to`.
    GradientLine {
        points: Vec<Point3<f64>>,
        weight: f64,
        from: Color,
        to: Color,
    },

    /// A text label with its baseline origin at `position`.
    Text {
        text: String,
        position: Point3<f64>,

        /// Height of the text in local units.
        size: f64,
        color: Color,
    },

    /// An image in the local XY plane with its corner at the origin.
    Image {
        pixels: Arc<RgbaImage>,
        width: f64,
        height: f64,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GRAY: Color = Color::rgb(160, 160, 164);
    pub const LIGHT_GRAY: Color = Color::rgb(192, 192, 192);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The `#rrggbb` name of the color.
    pub fn name(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation towards `other`, `t` is clamped to [0, 1].
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = util::maths::clamp(&t, &0.0, &1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl FromStr for Color {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaletteError::InvalidColorName(s.to_string());

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = PaletteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Primitive {
    /// Number of vertices (or characters for text) in the primitive.
    pub fn len(&self) -> usize {
        match self {
            Primitive::Points { points, .. } | Primitive::GradientPoints { points, .. } => {
                points.len()
            }
            Primitive::Line { points, .. } | Primitive::GradientLine { points, .. } => {
                points.len()
            }
            Primitive::Text { text, .. } => text.len(),
            Primitive::Image { .. } => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
