//! Coordinate transforms between plot and pixel space.

use crate::geom::{PixelPoint, Point};
use crate::property::Axes;

/// Linear plot-to-pixel mapping captured from a viewport.
///
/// Pixel y grows downward while plot y grows upward, so the y axis is
/// flipped. [`Transform::to_pixel`] is relative to the origin: renderers
/// translate their surface by [`Transform::origin`] once per redraw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    origin: Axes<f64>,
    scale: Axes<f64>,
}

impl Transform {
    /// Create a transform from an origin (pixels) and a scale (pixels per unit).
    pub fn new(origin: Axes<f64>, scale: Axes<f64>) -> Self {
        Self { origin, scale }
    }

    /// Pixel offset of plot-space `(0, 0)`.
    pub fn origin(&self) -> PixelPoint {
        PixelPoint::new(self.origin.x as f32, self.origin.y as f32)
    }

    /// Map a plot point relative to the translated origin.
    pub fn to_pixel(&self, point: Point) -> PixelPoint {
        PixelPoint::new(
            (point.x * self.scale.x) as f32,
            (-point.y * self.scale.y) as f32,
        )
    }

    /// Map a plot point to absolute surface pixels.
    pub fn to_absolute_pixel(&self, point: Point) -> PixelPoint {
        self.to_pixel(point).offset(self.origin())
    }

    /// Map absolute surface pixels back into plot space.
    pub fn to_plot(&self, pixel: PixelPoint) -> Point {
        Point::new(
            (pixel.x as f64 - self.origin.x) / self.scale.x,
            (self.origin.y - pixel.y as f64) / self.scale.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let transform = Transform::new(Axes::new(120.0, 80.0), Axes::new(40.0, 20.0));
        let point = Point::new(2.5, -1.25);
        let pixel = transform.to_absolute_pixel(point);
        let back = transform.to_plot(pixel);
        assert!((back.x - point.x).abs() < 1e-6);
        assert!((back.y - point.y).abs() < 1e-6);
    }

    #[test]
    fn relative_mapping_ignores_origin() {
        let transform = Transform::new(Axes::new(300.0, 300.0), Axes::splat(50.0));
        assert_eq!(
            transform.to_pixel(Point::new(1.0, 1.0)),
            PixelPoint::new(50.0, -50.0)
        );
    }
}
