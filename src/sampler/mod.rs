//! Point generation for the four trace kinds.
//!
//! A [`Sampler`] turns a mathematical relation into a restartable, finite,
//! lazy sequence of plot-space points. Every call to [`Sampler::sample`] with
//! the same [`SampleParams`] reproduces the same sequence. The returned
//! [`Samples`] borrow the sampler, so a trace cannot be dropped or replaced
//! while one of its sequences is still being consumed.

mod continuous;
mod discrete;
mod parametric;

use std::fmt;
use std::sync::Arc;

use crate::error::{PlotError, Result};
use crate::geom::Point;
use crate::view::Range;

use continuous::ContinuousSamples;
use discrete::DiscreteSamples;
use parametric::ParametricSamples;

/// Function of a coordinate (or parameter) and time.
pub type CurveFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Function of time alone.
pub type TimeFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Wrap a closure of `(x, t)` into a [`CurveFn`].
pub fn curve(f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> CurveFn {
    Arc::new(f)
}

/// Wrap a closure of `t` into a [`TimeFn`].
pub fn time_fn(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> TimeFn {
    Arc::new(f)
}

/// Largest magnitude handed downstream; larger values are clamped.
pub const MAX_SAFE_VALUE: f64 = 9_007_199_254_740_991.0;

/// Default hard cap on the number of steps a single sequence may take.
pub const DEFAULT_MAX_SAMPLES: usize = 1_000_000;

/// Which of the four generators a sampler uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceKind {
    /// `y = f(x, t)` sampled adaptively across the visible x range.
    Continuous,
    /// `(x(p, t), y(p, t))` over a parameter range.
    Parametric,
    /// Literal x values mapped through `y = f(x, t)`.
    DiscreteMap,
    /// Index-aligned x and y lists.
    DiscretePoints,
}

/// X element of a discrete point list.
#[derive(Clone)]
pub enum Abscissa {
    /// Fixed value.
    Literal(f64),
    /// Value that depends on time.
    Dynamic(TimeFn),
}

impl Abscissa {
    /// Evaluate at the given time.
    pub fn eval(&self, time: f64) -> f64 {
        match self {
            Self::Literal(value) => *value,
            Self::Dynamic(f) => f(time),
        }
    }
}

impl fmt::Debug for Abscissa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "Abscissa::Literal({value})"),
            Self::Dynamic(_) => write!(f, "Abscissa::Dynamic(..)"),
        }
    }
}

/// Y element of a discrete point list.
#[derive(Clone)]
pub enum Ordinate {
    /// Fixed value.
    Literal(f64),
    /// Value that depends on the point's x and on time.
    Dynamic(CurveFn),
}

impl Ordinate {
    /// Evaluate at the given x and time.
    pub fn eval(&self, x: f64, time: f64) -> f64 {
        match self {
            Self::Literal(value) => *value,
            Self::Dynamic(f) => f(x, time),
        }
    }
}

impl fmt::Debug for Ordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "Ordinate::Literal({value})"),
            Self::Dynamic(_) => write!(f, "Ordinate::Dynamic(..)"),
        }
    }
}

/// Inputs shared by every sampling call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleParams {
    /// Animation time in seconds.
    pub time: f64,
    /// Visible x range.
    pub x_lims: Range,
    /// Visible y range.
    pub y_lims: Range,
    /// Distance between successive samples, in plot units (or parameter units).
    pub step: f64,
    /// Parameter range for parametric traces.
    pub parameter_range: Range,
    /// Hard cap on the number of steps.
    pub max_samples: usize,
}

impl SampleParams {
    /// Create parameters with a `[0, 1]` parameter range and the default cap.
    pub fn new(time: f64, x_lims: Range, y_lims: Range, step: f64) -> Self {
        Self {
            time,
            x_lims,
            y_lims,
            step,
            parameter_range: Range::new(0.0, 1.0),
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }

    /// Set the parameter range.
    pub fn with_parameter_range(mut self, range: Range) -> Self {
        self.parameter_range = range;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Index of the last step inside `range`, or `None` if nothing can be
    /// sampled. Capped at `max_samples`.
    pub(crate) fn last_index(&self, range: Range) -> Option<usize> {
        if !(self.step > 0.0 && self.step.is_finite()) {
            log::warn!("cannot sample with step {}", self.step);
            return None;
        }
        if !range.is_finite() || range.max < range.min || self.max_samples == 0 {
            return None;
        }
        // Tolerate accumulated rounding so the far bound is not dropped.
        let steps = (range.span() / self.step + 1e-9).floor();
        let cap = self.max_samples - 1;
        if steps > cap as f64 {
            log::warn!(
                "sampling {} steps over [{}, {}] exceeds the cap of {}",
                steps,
                range.min,
                range.max,
                self.max_samples
            );
            return Some(cap);
        }
        Some(steps as usize)
    }
}

/// A point generator bound to user data.
#[derive(Clone)]
pub enum Sampler {
    /// Adaptive sampling of `y = f(x, t)`.
    Continuous(CurveFn),
    /// Parametric curve.
    Parametric {
        /// `x(p, t)`.
        x: CurveFn,
        /// `y(p, t)`.
        y: CurveFn,
    },
    /// Literal x values through `y = f(x, t)`.
    DiscreteMap {
        /// X values.
        xs: Vec<f64>,
        /// `f(x, t)`.
        f: CurveFn,
    },
    /// Index-aligned x and y lists.
    DiscretePoints {
        /// X elements.
        xs: Vec<Abscissa>,
        /// Y elements.
        ys: Vec<Ordinate>,
    },
}

impl Sampler {
    /// Create a continuous sampler. `f` must return a number at `(0, 0)`.
    pub fn continuous(f: CurveFn) -> Result<Self> {
        check_numeric("f(x, t)", f(0.0, 0.0))?;
        Ok(Self::Continuous(f))
    }

    /// Create a parametric sampler. Both functions must return numbers at `(0, 0)`.
    pub fn parametric(x: CurveFn, y: CurveFn) -> Result<Self> {
        check_numeric("x(p, t)", x(0.0, 0.0))?;
        check_numeric("y(p, t)", y(0.0, 0.0))?;
        Ok(Self::Parametric { x, y })
    }

    /// Create a discrete map sampler. `f` must return a number at `(0, 0)`.
    pub fn discrete_map(xs: Vec<f64>, f: CurveFn) -> Result<Self> {
        check_numeric("f(x, t)", f(0.0, 0.0))?;
        Ok(Self::DiscreteMap { xs, f })
    }

    /// Create a discrete point sampler from index-aligned lists.
    ///
    /// Every dynamic element must return a number at time 0.
    pub fn discrete_points(xs: Vec<Abscissa>, ys: Vec<Ordinate>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(PlotError::WrongLength {
                property: "y values".to_owned(),
                expected: xs.len(),
                found: ys.len(),
            });
        }
        for (index, x) in xs.iter().enumerate() {
            check_numeric(&format!("x[{index}]"), x.eval(0.0))?;
        }
        for (index, y) in ys.iter().enumerate() {
            check_numeric(&format!("y[{index}]"), y.eval(0.0, 0.0))?;
        }
        Ok(Self::DiscretePoints { xs, ys })
    }

    /// The generator kind.
    pub fn kind(&self) -> TraceKind {
        match self {
            Self::Continuous(_) => TraceKind::Continuous,
            Self::Parametric { .. } => TraceKind::Parametric,
            Self::DiscreteMap { .. } => TraceKind::DiscreteMap,
            Self::DiscretePoints { .. } => TraceKind::DiscretePoints,
        }
    }

    /// Start a fresh sequence of points.
    pub fn sample(&self, params: &SampleParams) -> Samples<'_> {
        let inner = match self {
            Self::Continuous(f) => Inner::Continuous(ContinuousSamples::new(f, params)),
            Self::Parametric { x, y } => Inner::Parametric(ParametricSamples::new(x, y, params)),
            Self::DiscreteMap { xs, f } => Inner::Discrete(DiscreteSamples::map(xs, f, params)),
            Self::DiscretePoints { xs, ys } => {
                Inner::Discrete(DiscreteSamples::points(xs, ys, params))
            }
        };
        Samples { inner }
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscreteMap { xs, .. } => write!(f, "Sampler::DiscreteMap({} points)", xs.len()),
            Self::DiscretePoints { xs, .. } => {
                write!(f, "Sampler::DiscretePoints({} points)", xs.len())
            }
            other => write!(f, "Sampler::{:?}", other.kind()),
        }
    }
}

enum Inner<'a> {
    Continuous(ContinuousSamples<'a>),
    Parametric(ParametricSamples<'a>),
    Discrete(DiscreteSamples<'a>),
}

/// Lazy sequence of plot-space points produced by a [`Sampler`].
///
/// Points come in runs. A run ends where the relation leaves the visible
/// range or becomes undefined; [`Samples::segments`] groups them.
pub struct Samples<'a> {
    inner: Inner<'a>,
}

impl<'a> Samples<'a> {
    /// Whether the most recently returned point began a new run.
    pub fn starts_run(&self) -> bool {
        match &self.inner {
            Inner::Continuous(samples) => samples.starts_run(),
            Inner::Parametric(samples) => samples.starts_run(),
            Inner::Discrete(samples) => samples.starts_run(),
        }
    }

    /// Group the remaining points into runs.
    pub fn segments(self) -> Segments<'a> {
        Segments {
            samples: self,
            current: Vec::new(),
            done: false,
        }
    }
}

impl Iterator for Samples<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        match &mut self.inner {
            Inner::Continuous(samples) => samples.next(),
            Inner::Parametric(samples) => samples.next(),
            Inner::Discrete(samples) => samples.next(),
        }
    }
}

/// Runs of connected points.
pub struct Segments<'a> {
    samples: Samples<'a>,
    current: Vec<Point>,
    done: bool,
}

impl Iterator for Segments<'_> {
    type Item = Vec<Point>;

    fn next(&mut self) -> Option<Vec<Point>> {
        if self.done {
            return None;
        }
        while let Some(point) = self.samples.next() {
            if self.samples.starts_run() && !self.current.is_empty() {
                return Some(std::mem::replace(&mut self.current, vec![point]));
            }
            self.current.push(point);
        }
        self.done = true;
        if self.current.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.current))
        }
    }
}

/// Clamp a value into the safe range, preserving sign.
pub(crate) fn clamp_safe(value: f64) -> f64 {
    value.clamp(-MAX_SAFE_VALUE, MAX_SAFE_VALUE)
}

fn check_numeric(name: &str, value: f64) -> Result<()> {
    if value.is_nan() {
        Err(PlotError::NonNumericFunctionResult(name.to_owned()))
    } else {
        Ok(())
    }
}
