//! Colours, line styles and marker shapes.

use crate::error::{PlotError, Result};
use crate::property::{Value, validate_choice, validate_single};

/// RGBA colour.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Colour {
    /// Create a new colour.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic colour name.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| PlotError::InvalidColour(text.to_owned()));
        }
        let rgb = match text.to_ascii_lowercase().as_str() {
            "black" => 0x000000,
            "white" => 0xffffff,
            "red" => 0xff0000,
            "green" => 0x008000,
            "blue" => 0x0000ff,
            "orange" => 0xffa500,
            "purple" => 0x800080,
            "grey" | "gray" => 0x808080,
            "transparent" => return Ok(Self::new(0.0, 0.0, 0.0, 0.0)),
            _ => return Err(PlotError::InvalidColour(text.to_owned())),
        };
        Ok(Self::from_rgb(rgb))
    }

    fn from_rgb(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0), 1.0)
    }
}

fn parse_hex(hex: &str) -> Option<Colour> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digits: Vec<u8> = match hex.len() {
        3 => hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
            .collect::<Option<_>>()?,
        6 | 8 => (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
            .collect::<Option<_>>()?,
        _ => return None,
    };
    let channel = |i: usize| digits.get(i).map_or(1.0, |&d| d as f32 / 255.0);
    Some(Colour::new(channel(0), channel(1), channel(2), channel(3)))
}

pub(crate) fn validate_colour(property: &str, value: &Value) -> Result<Colour> {
    let text = validate_single::<String>(property, value)?;
    Colour::parse(&text)
}

/// Connecting-line style of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Dots.
    Dotted,
    /// Dashes.
    Dashed,
    /// Alternating dashes and dots.
    DashDot,
    /// No connecting line.
    None,
}

impl TraceStyle {
    /// Every style, in option-name order.
    pub const ALL: [Self; 5] = [
        Self::Solid,
        Self::Dotted,
        Self::Dashed,
        Self::DashDot,
        Self::None,
    ];

    /// Option name of the style.
    pub fn name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dotted => "dotted",
            Self::Dashed => "dashed",
            Self::DashDot => "dashdot",
            Self::None => "none",
        }
    }

    /// On/off dash lengths in pixels for a line of the given width.
    ///
    /// Empty for solid lines.
    pub fn dash_pattern(self, width: f32) -> Vec<f32> {
        let unit = width.max(1.0);
        let pattern: &[f32] = match self {
            Self::Solid | Self::None => &[],
            Self::Dotted => &[1.0, 2.0],
            Self::Dashed => &[6.0, 4.0],
            Self::DashDot => &[6.0, 3.0, 1.0, 3.0],
        };
        pattern.iter().map(|length| length * unit).collect()
    }
}

pub(crate) fn validate_trace_style(property: &str, value: &Value) -> Result<TraceStyle> {
    let names = TraceStyle::ALL.map(|style| style.name().to_owned());
    let name = validate_choice(property, value, &names)?;
    Ok(TraceStyle::ALL
        .into_iter()
        .find(|style| style.name() == name)
        .unwrap_or_default())
}

/// Marker glyph drawn at sampled points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerShape {
    /// Filled circle.
    Circle,
    /// Upright cross.
    Plus,
    /// Diagonal cross.
    Cross,
    /// Arrow head oriented along the trace.
    Arrow,
    /// No markers.
    #[default]
    None,
}

impl MarkerShape {
    /// Every shape, in option-name order.
    pub const ALL: [Self; 5] = [
        Self::Circle,
        Self::Plus,
        Self::Cross,
        Self::Arrow,
        Self::None,
    ];

    /// Option name of the shape.
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Plus => "plus",
            Self::Cross => "cross",
            Self::Arrow => "arrow",
            Self::None => "none",
        }
    }
}

pub(crate) fn validate_marker_shape(property: &str, value: &Value) -> Result<MarkerShape> {
    let names = MarkerShape::ALL.map(|shape| shape.name().to_owned());
    let name = validate_choice(property, value, &names)?;
    Ok(MarkerShape::ALL
        .into_iter()
        .find(|shape| shape.name() == name)
        .unwrap_or_default())
}

/// Stroke styling of a trace's connecting line.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke colour.
    pub colour: Colour,
    /// Stroke width in pixels.
    pub width: f32,
    /// Dash style.
    pub style: TraceStyle,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            colour: Colour::BLACK,
            width: 2.0,
            style: TraceStyle::Solid,
        }
    }
}

/// Marker styling.
///
/// Marker sizes are expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Marker colour.
    pub colour: Colour,
    /// Marker size in pixels.
    pub size: f32,
    /// Marker shape.
    pub shape: MarkerShape,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            colour: Colour::BLACK,
            size: 6.0,
            shape: MarkerShape::None,
        }
    }
}
