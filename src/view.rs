//! Visible ranges and the viewport that maps plot units onto pixels.
//!
//! A [`Viewport`] stores its origin and per-axis scale. The visible limits
//! are always derived from them: writing limits recomputes scale and origin,
//! writing origin or scale recomputes limits. Both sides never drift apart.

use crate::error::{PlotError, Result};
use crate::geom::{PixelPoint, Point};
use crate::property::{
    Axes, Value, ignore_unknown_option, resolve_provided, validate_array, validate_axes_pair,
    validate_choice, validate_positive,
};
use crate::transform::Transform;

/// Scale used by a freshly created viewport, in pixels per unit.
pub const DEFAULT_SCALE: f64 = 50.0;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a range without checking the bound order.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Create a range, rejecting `max < min` and non-finite bounds.
    pub fn checked(property: &str, min: f64, max: f64) -> Result<Self> {
        let range = Self { min, max };
        if range.is_finite() && max >= min {
            Ok(range)
        } else {
            Err(PlotError::InvalidRange {
                property: property.to_owned(),
                min,
                max,
            })
        }
    }

    /// Create a range that must also have a positive span.
    pub fn checked_span(property: &str, min: f64, max: f64) -> Result<Self> {
        let range = Self::checked(property, min, max)?;
        if range.span() > 0.0 {
            Ok(range)
        } else {
            Err(PlotError::InvalidRange {
                property: property.to_owned(),
                min,
                max,
            })
        }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether a value lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Validate a two-element `[min, max]` option.
pub(crate) fn validate_range(property: &str, value: &Value) -> Result<Range> {
    let bounds = validate_array::<f64>(property, value, 2)?;
    Range::checked(property, bounds[0], bounds[1])
}

/// Placement of the plot-space origin on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Origin {
    /// Centre of the surface, rounded to whole pixels.
    Centre,
    /// Explicit pixel position.
    At(f64, f64),
}

/// What a resize keeps fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Keep origin and scale; the visible window grows or shrinks.
    #[default]
    PreserveScale,
    /// Keep the visible limits; scale and origin are recomputed.
    PreserveLimits,
}

/// Origin, scale and visible limits of a plot surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    origin: Axes<f64>,
    scale: Axes<f64>,
    x_lims: Range,
    y_lims: Range,
    resize_policy: ResizePolicy,
}

impl Viewport {
    /// Create a viewport for a surface of the given pixel size.
    ///
    /// The origin starts at the centre with [`DEFAULT_SCALE`] on both axes.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        validate_positive("width", width)?;
        validate_positive("height", height)?;
        let mut viewport = Self {
            width,
            height,
            origin: Axes::splat(0.0),
            scale: Axes::splat(DEFAULT_SCALE),
            x_lims: Range::new(0.0, 0.0),
            y_lims: Range::new(0.0, 0.0),
            resize_policy: ResizePolicy::default(),
        };
        viewport.set_origin(Origin::Centre)?;
        Ok(viewport)
    }

    /// Choose what a resize keeps fixed.
    pub fn with_resize_policy(mut self, policy: ResizePolicy) -> Self {
        self.resize_policy = policy;
        self
    }

    /// Surface width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Pixel position of plot-space `(0, 0)`.
    pub fn origin(&self) -> Axes<f64> {
        self.origin
    }

    /// Pixels per plot unit.
    pub fn scale(&self) -> Axes<f64> {
        self.scale
    }

    /// Visible x range in plot units.
    pub fn x_lims(&self) -> Range {
        self.x_lims
    }

    /// Visible y range in plot units.
    pub fn y_lims(&self) -> Range {
        self.y_lims
    }

    /// Active resize policy.
    pub fn resize_policy(&self) -> ResizePolicy {
        self.resize_policy
    }

    /// Snapshot of the plot-to-pixel mapping.
    pub fn transform(&self) -> Transform {
        Transform::new(self.origin, self.scale)
    }

    /// Place the origin and recompute the limits.
    ///
    /// Explicit coordinates must be finite.
    pub fn set_origin(&mut self, origin: Origin) -> Result<()> {
        self.origin = self.resolve_origin(origin)?;
        self.recompute_limits();
        Ok(())
    }

    /// Set pixels per unit, holding the origin fixed.
    pub fn set_scale(&mut self, x: f64, y: f64) -> Result<()> {
        let scale = Axes::new(validate_positive("scale", x)?, validate_positive("scale", y)?);
        self.scale = scale;
        self.recompute_limits();
        Ok(())
    }

    /// Show exactly `[min, max]` horizontally.
    ///
    /// The vertical origin component is left unchanged.
    pub fn set_x_lims(&mut self, min: f64, max: f64) -> Result<()> {
        let range = Range::checked_span("xLims", min, max)?;
        let fit = fit_x("xLims", self.width, range)?;
        self.scale.x = fit.scale;
        self.origin.x = fit.origin;
        self.recompute_limits();
        Ok(())
    }

    /// Show exactly `[min, max]` vertically.
    ///
    /// The horizontal origin component is left unchanged.
    pub fn set_y_lims(&mut self, min: f64, max: f64) -> Result<()> {
        let range = Range::checked_span("yLims", min, max)?;
        let fit = fit_y("yLims", self.height, range)?;
        self.scale.y = fit.scale;
        self.origin.y = fit.origin;
        self.recompute_limits();
        Ok(())
    }

    /// React to a new surface size according to the resize policy.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        validate_positive("width", width)?;
        validate_positive("height", height)?;
        if self.resize_policy == ResizePolicy::PreserveLimits {
            let x = fit_x("xLims", width, self.x_lims)?;
            let y = fit_y("yLims", height, self.y_lims)?;
            self.scale = Axes::new(x.scale, y.scale);
            self.origin = Axes::new(x.origin, y.origin);
        }
        self.width = width;
        self.height = height;
        self.recompute_limits();
        Ok(())
    }

    /// Validate every provided option, then apply them in order: origin,
    /// scale, limits. Nothing changes if any option is invalid.
    pub fn apply(&mut self, options: &ViewportOptions) -> Result<()> {
        let origin = resolve_provided("origin", options.origin.as_ref(), validate_origin)?;
        let scale = resolve_provided("scale", options.scale.as_ref(), validate_scale)?;
        let x_lims = resolve_provided("xLims", options.x_lims.as_ref(), validate_lims)?;
        let y_lims = resolve_provided("yLims", options.y_lims.as_ref(), validate_lims)?;
        let origin = origin
            .map(|origin| self.resolve_origin(origin))
            .transpose()?;
        let x_fit = x_lims
            .map(|range| fit_x("xLims", self.width, range))
            .transpose()?;
        let y_fit = y_lims
            .map(|range| fit_y("yLims", self.height, range))
            .transpose()?;

        if let Some(origin) = origin {
            self.origin = origin;
        }
        if let Some(scale) = scale {
            self.scale = scale;
        }
        if let Some(fit) = x_fit {
            self.scale.x = fit.scale;
            self.origin.x = fit.origin;
        }
        if let Some(fit) = y_fit {
            self.scale.y = fit.scale;
            self.origin.y = fit.origin;
        }
        self.recompute_limits();
        Ok(())
    }

    /// Map a plot-space point relative to the translated origin.
    pub fn to_pixel(&self, point: Point) -> PixelPoint {
        self.transform().to_pixel(point)
    }

    /// Map a plot-space point to absolute surface pixels.
    pub fn to_absolute_pixel(&self, point: Point) -> PixelPoint {
        self.transform().to_absolute_pixel(point)
    }

    /// Map absolute surface pixels back to plot space.
    pub fn to_plot(&self, pixel: PixelPoint) -> Point {
        self.transform().to_plot(pixel)
    }

    fn resolve_origin(&self, origin: Origin) -> Result<Axes<f64>> {
        match origin {
            Origin::Centre => Ok(Axes::new(
                (self.width / 2.0).round(),
                (self.height / 2.0).round(),
            )),
            Origin::At(x, y) => Ok(Axes::new(
                validate_finite("origin", x)?,
                validate_finite("origin", y)?,
            )),
        }
    }

    fn recompute_limits(&mut self) {
        self.x_lims = Range::new(
            -self.origin.x / self.scale.x,
            (self.width - self.origin.x) / self.scale.x,
        );
        self.y_lims = Range::new(
            -(self.height - self.origin.y) / self.scale.y,
            self.origin.y / self.scale.y,
        );
    }
}

/// Raw viewport options.
///
/// Recognized keys are `origin`, `scale`, `xLims` and `yLims`; anything else
/// passed through [`ViewportOptions::from_pairs`] is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportOptions {
    /// `"centre"` or one/two pixel coordinates.
    pub origin: Option<Value>,
    /// One or two positive pixels-per-unit values.
    pub scale: Option<Value>,
    /// `[min, max]` visible x range.
    pub x_lims: Option<Value>,
    /// `[min, max]` visible y range.
    pub y_lims: Option<Value>,
}

impl ViewportOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from string keys, skipping unknown ones.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "origin" => options.origin = Some(value),
                "scale" => options.scale = Some(value),
                "xLims" => options.x_lims = Some(value),
                "yLims" => options.y_lims = Some(value),
                other => ignore_unknown_option("viewport", other),
            }
        }
        options
    }

    /// Set the origin option.
    pub fn origin(mut self, value: impl Into<Value>) -> Self {
        self.origin = Some(value.into());
        self
    }

    /// Set the scale option.
    pub fn scale(mut self, value: impl Into<Value>) -> Self {
        self.scale = Some(value.into());
        self
    }

    /// Set the visible x range option.
    pub fn x_lims(mut self, value: impl Into<Value>) -> Self {
        self.x_lims = Some(value.into());
        self
    }

    /// Set the visible y range option.
    pub fn y_lims(mut self, value: impl Into<Value>) -> Self {
        self.y_lims = Some(value.into());
        self
    }
}

/// Scale and origin component that show a range across `length` pixels.
#[derive(Debug, Clone, Copy)]
struct AxisFit {
    scale: f64,
    origin: f64,
}

fn fit_x(property: &str, length: f64, range: Range) -> Result<AxisFit> {
    fit_axis(property, length, range, -range.min)
}

fn fit_y(property: &str, length: f64, range: Range) -> Result<AxisFit> {
    fit_axis(property, length, range, range.max)
}

/// The span may overflow, or be too small for a representable scale.
fn fit_axis(property: &str, length: f64, range: Range, anchor: f64) -> Result<AxisFit> {
    let scale = length / range.span();
    let origin = anchor * scale;
    if scale.is_finite() && scale > 0.0 && origin.is_finite() {
        Ok(AxisFit { scale, origin })
    } else {
        Err(PlotError::InvalidRange {
            property: property.to_owned(),
            min: range.min,
            max: range.max,
        })
    }
}

fn validate_finite(property: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PlotError::NonFinite {
            property: property.to_owned(),
            value,
        })
    }
}

fn validate_origin(property: &str, value: &Value) -> Result<Origin> {
    if let Value::Text(_) = value {
        validate_choice(property, value, &["centre".to_owned()])?;
        return Ok(Origin::Centre);
    }
    let origin = validate_axes_pair::<f64>(property, value)?;
    Ok(Origin::At(origin.x, origin.y))
}

fn validate_scale(property: &str, value: &Value) -> Result<Axes<f64>> {
    let scale = validate_axes_pair::<f64>(property, value)?;
    Ok(Axes::new(
        validate_positive(property, scale.x)?,
        validate_positive(property, scale.y)?,
    ))
}

fn validate_lims(property: &str, value: &Value) -> Result<Range> {
    let range = validate_range(property, value)?;
    Range::checked_span(property, range.min, range.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn viewport() -> Viewport {
        Viewport::new(500.0, 400.0).expect("valid size")
    }

    #[test]
    fn new_viewport_is_centred() {
        let viewport = viewport();
        assert_eq!(viewport.origin(), Axes::new(250.0, 200.0));
        assert_eq!(viewport.x_lims(), Range::new(-5.0, 5.0));
        assert_eq!(viewport.y_lims(), Range::new(-4.0, 4.0));
    }

    #[test]
    fn centre_rounds_to_whole_pixels() {
        let viewport = Viewport::new(301.0, 99.0).expect("valid size");
        assert_eq!(viewport.origin(), Axes::new(151.0, 50.0));
    }

    #[test]
    fn x_lims_roundtrip() {
        let mut viewport = viewport();
        viewport.set_x_lims(-3.0, 7.0).expect("valid range");
        assert!((viewport.x_lims().min + 3.0).abs() < EPS);
        assert!((viewport.x_lims().max - 7.0).abs() < EPS);
        assert!((viewport.scale().x - 50.0).abs() < EPS);
        assert_eq!(viewport.origin().y, 200.0);
    }

    #[test]
    fn y_lims_roundtrip_keeps_x_origin() {
        let mut viewport = viewport();
        viewport.set_y_lims(-1.0, 3.0).expect("valid range");
        assert!((viewport.y_lims().min + 1.0).abs() < EPS);
        assert!((viewport.y_lims().max - 3.0).abs() < EPS);
        assert!((viewport.scale().y - 100.0).abs() < EPS);
        assert_eq!(viewport.origin().x, 250.0);
    }

    #[test]
    fn inverted_lims_are_rejected_without_mutation() {
        let mut viewport = viewport();
        let before = viewport.clone();
        assert!(matches!(
            viewport.set_y_lims(3.0, -1.0),
            Err(PlotError::InvalidRange { ref property, .. }) if property == "yLims"
        ));
        assert!(viewport.set_x_lims(2.0, 2.0).is_err());
        assert_eq!(viewport, before);
    }

    #[test]
    fn unrepresentable_lims_are_rejected_without_mutation() {
        let mut viewport = viewport();
        let before = viewport.clone();
        // Span overflows to infinity, which would give a zero scale.
        assert!(matches!(
            viewport.set_x_lims(-1e308, 1e308),
            Err(PlotError::InvalidRange { ref property, .. }) if property == "xLims"
        ));
        // Span too small for a finite scale.
        assert!(viewport.set_y_lims(0.0, 1e-320).is_err());
        let options = ViewportOptions::new().scale(10.0).x_lims([-1e308, 1e308]);
        assert!(viewport.apply(&options).is_err());
        assert_eq!(viewport, before);
        assert!(viewport.scale().x > 0.0 && viewport.x_lims().is_finite());
    }

    #[test]
    fn non_finite_origin_is_rejected_without_mutation() {
        let mut viewport = viewport();
        let before = viewport.clone();
        assert!(matches!(
            viewport.set_origin(Origin::At(f64::NAN, 0.0)),
            Err(PlotError::NonFinite { ref property, .. }) if property == "origin"
        ));
        assert!(viewport.set_origin(Origin::At(0.0, f64::INFINITY)).is_err());
        let options = ViewportOptions::new().origin([f64::NAN, 1.0]);
        assert!(viewport.apply(&options).is_err());
        assert_eq!(viewport, before);
    }

    #[test]
    fn scale_recomputes_limits_around_origin() {
        let mut viewport = viewport();
        viewport.set_scale(100.0, 25.0).expect("positive scale");
        assert_eq!(viewport.x_lims(), Range::new(-2.5, 2.5));
        assert_eq!(viewport.y_lims(), Range::new(-8.0, 8.0));
        assert!(viewport.set_scale(0.0, 1.0).is_err());
    }

    #[test]
    fn resize_preserves_scale_by_default() {
        let mut viewport = viewport();
        viewport.resize(1000.0, 400.0).expect("valid size");
        assert_eq!(viewport.scale(), Axes::splat(50.0));
        assert_eq!(viewport.x_lims(), Range::new(-5.0, 15.0));
    }

    #[test]
    fn resize_can_preserve_limits() {
        let mut viewport = viewport().with_resize_policy(ResizePolicy::PreserveLimits);
        viewport.resize(1000.0, 800.0).expect("valid size");
        assert!((viewport.x_lims().min + 5.0).abs() < EPS);
        assert!((viewport.x_lims().max - 5.0).abs() < EPS);
        assert!((viewport.scale().x - 100.0).abs() < EPS);
        assert!((viewport.scale().y - 100.0).abs() < EPS);
    }

    #[test]
    fn pixel_mapping_flips_y() {
        let viewport = viewport();
        assert_eq!(
            viewport.to_pixel(Point::new(1.0, 1.0)),
            PixelPoint::new(50.0, -50.0)
        );
        assert_eq!(
            viewport.to_absolute_pixel(Point::new(1.0, 1.0)),
            PixelPoint::new(300.0, 150.0)
        );
        let back = viewport.to_plot(PixelPoint::new(300.0, 150.0));
        assert!((back.x - 1.0).abs() < 1e-6 && (back.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn options_apply_atomically() {
        let mut viewport = viewport();
        let before = viewport.clone();
        let bad = ViewportOptions::new().scale(20.0).x_lims([4.0, 1.0]);
        assert!(viewport.apply(&bad).is_err());
        assert_eq!(viewport, before);

        let good = ViewportOptions::from_pairs([
            ("origin", Value::from("centre")),
            ("scale", Value::from([10.0, 20.0])),
            ("gridColour", Value::from("grey")),
        ]);
        viewport.apply(&good).expect("valid options");
        assert_eq!(viewport.scale(), Axes::new(10.0, 20.0));
        assert_eq!(viewport.x_lims(), Range::new(-25.0, 25.0));
    }

    #[test]
    fn origin_text_must_be_centre() {
        let mut viewport = viewport();
        let options = ViewportOptions::new().origin("middle");
        assert!(matches!(
            viewport.apply(&options),
            Err(PlotError::InvalidChoice { .. })
        ));
    }
}
