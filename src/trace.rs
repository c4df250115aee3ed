//! Traces: a sampler bound to display properties.

use std::fmt;

use crate::error::{PlotError, Result};
use crate::property::{
    Value, ignore_unknown_option, resolve, resolve_provided, validate_positive, validate_single,
};
use crate::sampler::{
    Abscissa, CurveFn, Ordinate, SampleParams, Sampler, Samples, TimeFn, TraceKind, curve, time_fn,
};
use crate::style::{
    Colour, LineStyle, MarkerShape, MarkerStyle, TraceStyle, validate_colour,
    validate_marker_shape, validate_trace_style,
};
use crate::view::{Range, Viewport, validate_range};

const DEFAULT_TRACE_COLOUR: &str = "#000000";
const DEFAULT_TRACE_STYLE: &str = "solid";
const DEFAULT_TRACE_WIDTH: f64 = 2.0;
const DEFAULT_MARKER_COLOUR: &str = "#000000";
const DEFAULT_MARKER_STYLE: &str = "none";
const DEFAULT_MARKER_SIZE: f64 = 6.0;
const DEFAULT_VISIBILITY: bool = true;
const DEFAULT_PARAMETER_RANGE: [f64; 2] = [0.0, 1.0];

/// Raw trace data. Its shape decides the trace kind:
///
/// | Shape | Kind |
/// |---|---|
/// | `curve` | [`TraceKind::Continuous`] |
/// | `[curve, curve]` | [`TraceKind::Parametric`] |
/// | `[[numbers], curve]` | [`TraceKind::DiscreteMap`] |
/// | `[[numbers or time functions], [numbers or curves]]` | [`TraceKind::DiscretePoints`] |
#[derive(Clone)]
pub enum TraceData {
    /// Literal number.
    Number(f64),
    /// Function of time.
    OfTime(TimeFn),
    /// Function of a coordinate (or parameter) and time.
    Curve(CurveFn),
    /// List of data.
    List(Vec<TraceData>),
}

impl TraceData {
    /// Data from a closure of `(x, t)`.
    pub fn function(f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Curve(curve(f))
    }

    /// Data from a closure of `t`.
    pub fn of_time(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::OfTime(time_fn(f))
    }

    /// Two-element list.
    pub fn pair(first: impl Into<TraceData>, second: impl Into<TraceData>) -> Self {
        Self::List(vec![first.into(), second.into()])
    }

    fn shape_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::OfTime(_) => "function of time",
            Self::Curve(_) => "function of (x, t)",
            Self::List(_) => "list",
        }
    }

    /// Inspect the shape and build the matching sampler.
    pub(crate) fn into_sampler(self) -> Result<Sampler> {
        let items = match self {
            Self::Curve(f) => return Sampler::continuous(f),
            Self::List(items) => items,
            other => {
                return Err(PlotError::UnrecognisedDataShape(
                    other.shape_name().to_owned(),
                ));
            }
        };
        let [first, second] = <[TraceData; 2]>::try_from(items).map_err(|items| {
            PlotError::UnrecognisedDataShape(format!("list of {} elements", items.len()))
        })?;
        match (first, second) {
            (Self::List(xs), Self::List(ys)) => {
                let xs = xs
                    .into_iter()
                    .enumerate()
                    .map(|(index, x)| x.into_abscissa(index))
                    .collect::<Result<Vec<_>>>()?;
                let ys = ys
                    .into_iter()
                    .enumerate()
                    .map(|(index, y)| y.into_ordinate(index))
                    .collect::<Result<Vec<_>>>()?;
                Sampler::discrete_points(xs, ys)
            }
            (Self::List(xs), Self::Curve(f)) => {
                let xs = xs
                    .into_iter()
                    .enumerate()
                    .map(|(index, x)| x.into_literal(index))
                    .collect::<Result<Vec<_>>>()?;
                Sampler::discrete_map(xs, f)
            }
            (Self::Curve(x), Self::Curve(y)) => Sampler::parametric(x, y),
            (first, second) => Err(PlotError::UnrecognisedDataShape(format!(
                "[{}, {}]",
                first.shape_name(),
                second.shape_name()
            ))),
        }
    }

    fn into_abscissa(self, index: usize) -> Result<Abscissa> {
        match self {
            Self::Number(value) => Ok(Abscissa::Literal(value)),
            Self::OfTime(f) => Ok(Abscissa::Dynamic(f)),
            other => Err(element_type(
                format!("x[{index}]"),
                "number or function of time",
                &other,
            )),
        }
    }

    fn into_ordinate(self, index: usize) -> Result<Ordinate> {
        match self {
            Self::Number(value) => Ok(Ordinate::Literal(value)),
            Self::Curve(f) => Ok(Ordinate::Dynamic(f)),
            other => Err(element_type(
                format!("y[{index}]"),
                "number or function of (x, t)",
                &other,
            )),
        }
    }

    fn into_literal(self, index: usize) -> Result<f64> {
        match self {
            Self::Number(value) => Ok(value),
            other => Err(element_type(format!("x[{index}]"), "number", &other)),
        }
    }
}

fn element_type(property: String, expected: &'static str, found: &TraceData) -> PlotError {
    PlotError::WrongType {
        property,
        expected,
        found: found.shape_name(),
    }
}

impl fmt::Debug for TraceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "TraceData::Number({value})"),
            Self::List(items) => f.debug_list().entries(items).finish(),
            other => write!(f, "TraceData({})", other.shape_name()),
        }
    }
}

impl From<f64> for TraceData {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<f64>> for TraceData {
    fn from(values: Vec<f64>) -> Self {
        Self::List(values.into_iter().map(Self::Number).collect())
    }
}

impl<const N: usize> From<[f64; N]> for TraceData {
    fn from(values: [f64; N]) -> Self {
        Self::List(values.into_iter().map(Self::Number).collect())
    }
}

impl From<Vec<TraceData>> for TraceData {
    fn from(items: Vec<TraceData>) -> Self {
        Self::List(items)
    }
}

/// Raw trace options.
///
/// Recognized keys: `traceColour`, `traceStyle`, `traceWidth`,
/// `markerColour`, `markerStyle`, `markerSize`, `visibility`,
/// `parameterRange`. Unknown keys passed to [`TraceOptions::from_pairs`] are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceOptions {
    /// Line colour text.
    pub trace_colour: Option<Value>,
    /// One of `solid`, `dotted`, `dashed`, `dashdot`, `none`.
    pub trace_style: Option<Value>,
    /// Positive line width in pixels.
    pub trace_width: Option<Value>,
    /// Marker colour text.
    pub marker_colour: Option<Value>,
    /// One of `circle`, `plus`, `cross`, `arrow`, `none`.
    pub marker_style: Option<Value>,
    /// Positive marker size in pixels.
    pub marker_size: Option<Value>,
    /// Whether the trace is drawn.
    pub visibility: Option<Value>,
    /// `[min, max]` parameter range for parametric traces.
    pub parameter_range: Option<Value>,
}

impl TraceOptions {
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
            let slot = match key.as_ref() {
                "traceColour" => &mut options.trace_colour,
                "traceStyle" => &mut options.trace_style,
                "traceWidth" => &mut options.trace_width,
                "markerColour" => &mut options.marker_colour,
                "markerStyle" => &mut options.marker_style,
                "markerSize" => &mut options.marker_size,
                "visibility" => &mut options.visibility,
                "parameterRange" => &mut options.parameter_range,
                other => {
                    ignore_unknown_option("trace", other);
                    continue;
                }
            };
            *slot = Some(value);
        }
        options
    }

    /// Set the line colour.
    pub fn trace_colour(mut self, value: impl Into<Value>) -> Self {
        self.trace_colour = Some(value.into());
        self
    }

    /// Set the line style.
    pub fn trace_style(mut self, value: impl Into<Value>) -> Self {
        self.trace_style = Some(value.into());
        self
    }

    /// Set the line width.
    pub fn trace_width(mut self, value: impl Into<Value>) -> Self {
        self.trace_width = Some(value.into());
        self
    }

    /// Set the marker colour.
    pub fn marker_colour(mut self, value: impl Into<Value>) -> Self {
        self.marker_colour = Some(value.into());
        self
    }

    /// Set the marker style.
    pub fn marker_style(mut self, value: impl Into<Value>) -> Self {
        self.marker_style = Some(value.into());
        self
    }

    /// Set the marker size.
    pub fn marker_size(mut self, value: impl Into<Value>) -> Self {
        self.marker_size = Some(value.into());
        self
    }

    /// Set the visibility.
    pub fn visibility(mut self, value: impl Into<Value>) -> Self {
        self.visibility = Some(value.into());
        self
    }

    /// Set the parameter range.
    pub fn parameter_range(mut self, value: impl Into<Value>) -> Self {
        self.parameter_range = Some(value.into());
        self
    }
}

/// Validated display properties of a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceProperties {
    /// Connecting line.
    pub line: LineStyle,
    /// Markers.
    pub marker: MarkerStyle,
    /// Whether the trace is drawn.
    pub visible: bool,
    /// Parameter range for parametric traces.
    pub parameter_range: Range,
}

impl Default for TraceProperties {
    fn default() -> Self {
        Self {
            line: LineStyle {
                colour: Colour::BLACK,
                width: DEFAULT_TRACE_WIDTH as f32,
                style: TraceStyle::Solid,
            },
            marker: MarkerStyle {
                colour: Colour::BLACK,
                size: DEFAULT_MARKER_SIZE as f32,
                shape: MarkerShape::None,
            },
            visible: DEFAULT_VISIBILITY,
            parameter_range: Range::new(DEFAULT_PARAMETER_RANGE[0], DEFAULT_PARAMETER_RANGE[1]),
        }
    }
}

impl TraceProperties {
    /// Resolve every option against its static default.
    pub fn resolve(options: &TraceOptions) -> Result<Self> {
        Ok(Self {
            line: LineStyle {
                colour: resolve(
                    "traceColour",
                    options.trace_colour.as_ref(),
                    DEFAULT_TRACE_COLOUR.into(),
                    validate_colour,
                )?,
                width: resolve(
                    "traceWidth",
                    options.trace_width.as_ref(),
                    DEFAULT_TRACE_WIDTH.into(),
                    validate_size,
                )?,
                style: resolve(
                    "traceStyle",
                    options.trace_style.as_ref(),
                    DEFAULT_TRACE_STYLE.into(),
                    validate_trace_style,
                )?,
            },
            marker: MarkerStyle {
                colour: resolve(
                    "markerColour",
                    options.marker_colour.as_ref(),
                    DEFAULT_MARKER_COLOUR.into(),
                    validate_colour,
                )?,
                size: resolve(
                    "markerSize",
                    options.marker_size.as_ref(),
                    DEFAULT_MARKER_SIZE.into(),
                    validate_size,
                )?,
                shape: resolve(
                    "markerStyle",
                    options.marker_style.as_ref(),
                    DEFAULT_MARKER_STYLE.into(),
                    validate_marker_shape,
                )?,
            },
            visible: resolve(
                "visibility",
                options.visibility.as_ref(),
                DEFAULT_VISIBILITY.into(),
                validate_single::<bool>,
            )?,
            parameter_range: resolve(
                "parameterRange",
                options.parameter_range.as_ref(),
                DEFAULT_PARAMETER_RANGE.into(),
                validate_range,
            )?,
        })
    }

    /// Return a copy with the provided options applied on top.
    pub fn merged(&self, options: &TraceOptions) -> Result<Self> {
        let mut next = self.clone();
        if let Some(colour) =
            resolve_provided("traceColour", options.trace_colour.as_ref(), validate_colour)?
        {
            next.line.colour = colour;
        }
        if let Some(width) =
            resolve_provided("traceWidth", options.trace_width.as_ref(), validate_size)?
        {
            next.line.width = width;
        }
        if let Some(style) =
            resolve_provided("traceStyle", options.trace_style.as_ref(), validate_trace_style)?
        {
            next.line.style = style;
        }
        if let Some(colour) =
            resolve_provided("markerColour", options.marker_colour.as_ref(), validate_colour)?
        {
            next.marker.colour = colour;
        }
        if let Some(size) =
            resolve_provided("markerSize", options.marker_size.as_ref(), validate_size)?
        {
            next.marker.size = size;
        }
        if let Some(shape) = resolve_provided(
            "markerStyle",
            options.marker_style.as_ref(),
            validate_marker_shape,
        )? {
            next.marker.shape = shape;
        }
        if let Some(visible) = resolve_provided(
            "visibility",
            options.visibility.as_ref(),
            validate_single::<bool>,
        )? {
            next.visible = visible;
        }
        if let Some(range) = resolve_provided(
            "parameterRange",
            options.parameter_range.as_ref(),
            validate_range,
        )? {
            next.parameter_range = range;
        }
        Ok(next)
    }
}

fn validate_size(property: &str, value: &Value) -> Result<f32> {
    let size = validate_single::<f64>(property, value)?;
    Ok(validate_positive(property, size)? as f32)
}

/// One renderable data series on a plot surface.
#[derive(Debug, Clone)]
pub struct Trace {
    id: String,
    sampler: Sampler,
    properties: TraceProperties,
}

impl Trace {
    /// Validate options and data, then build the trace.
    pub fn new(id: impl Into<String>, data: TraceData, options: &TraceOptions) -> Result<Self> {
        let properties = TraceProperties::resolve(options)?;
        let sampler = data.into_sampler()?;
        Ok(Self {
            id: id.into(),
            sampler,
            properties,
        })
    }

    /// Access the trace identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Access the trace kind.
    pub fn kind(&self) -> TraceKind {
        self.sampler.kind()
    }

    /// Access the sampler.
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Access the display properties.
    pub fn properties(&self) -> &TraceProperties {
        &self.properties
    }

    /// Check if the trace is visible.
    pub fn is_visible(&self) -> bool {
        self.properties.visible
    }

    /// Sample the trace over a viewport's visible range.
    pub fn sample(
        &self,
        time: f64,
        viewport: &Viewport,
        step: f64,
        max_samples: usize,
    ) -> Samples<'_> {
        let params = SampleParams::new(time, viewport.x_lims(), viewport.y_lims(), step)
            .with_parameter_range(self.properties.parameter_range)
            .with_max_samples(max_samples);
        self.sampler.sample(&params)
    }

    /// Apply options atomically.
    pub fn apply(&mut self, options: &TraceOptions) -> Result<()> {
        self.properties = self.properties.merged(options)?;
        Ok(())
    }

    /// Set the line colour.
    pub fn set_trace_colour(&mut self, value: impl Into<Value>) -> Result<()> {
        self.apply(&TraceOptions::new().trace_colour(value))
    }

    /// Set the line style.
    pub fn set_trace_style(&mut self, value: impl Into<Value>) -> Result<()> {
        self.apply(&TraceOptions::new().trace_style(value))
    }

    /// Set the line width.
    pub fn set_trace_width(&mut self, value: impl Into<Value>) -> Result<()> {
        self.apply(&TraceOptions::new().trace_width(value))
    }

    /// Set the marker colour.
    pub fn set_marker_colour(&mut self, value: impl Into<Value>) -> Result<()> {
        self.apply(&TraceOptions::new().marker_colour(value))
    }

    /// Set the marker style.
    pub fn set_marker_style(&mut self, value: impl Into<Value>) -> Result<()> {
        self.apply(&TraceOptions::new().marker_style(value))
    }

    /// Set the marker size.
    pub fn set_marker_size(&mut self, value: impl Into<Value>) -> Result<()> {
        self.apply(&TraceOptions::new().marker_size(value))
    }

    /// Show or hide the trace.
    pub fn set_visibility(&mut self, value: impl Into<Value>) -> Result<()> {
        self.apply(&TraceOptions::new().visibility(value))
    }

    /// Set the parameter range; requires `max >= min`.
    pub fn set_parameter_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.apply(&TraceOptions::new().parameter_range([min, max]))
    }
}
