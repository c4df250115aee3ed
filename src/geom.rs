//! Geometric primitives used by the plotting pipeline.
//!
//! [`Point`] lives in plot space (x right, y up). [`PixelPoint`] lives in
//! pixel space (x right, y down) and is what renderers consume.

/// A point in plot space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in plot units.
    pub x: f64,
    /// Y value in plot units.
    pub y: f64,
}

impl Point {
    /// Create a new plot-space point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    /// X value in pixels.
    pub x: f32,
    /// Y value in pixels, growing downward.
    pub y: f32,
}

impl PixelPoint {
    /// Create a new pixel-space point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset this point by another one.
    pub fn offset(self, by: PixelPoint) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}
