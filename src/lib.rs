//! gpui_fnplot is a 2-D function and data plotting engine.
//!
//! A [`PlotSurface`] owns a [`Viewport`] (origin, scale and visible limits)
//! and a set of [`Trace`]s. Each trace samples a continuous function, a
//! parametric curve, a discrete map or a list of points at a given time, and
//! [`PlotSurface::redraw`] turns the samples into a backend-agnostic
//! [`DrawList`]. A [`Clock`] tracks play/pause/stop state for animated
//! surfaces and hands out elapsed times once per animation frame.
//!
//! The optional `gpui` feature provides a GPUI view that paints draw lists.

#![forbid(unsafe_code)]

pub mod clock;
pub mod error;
pub mod geom;
pub mod plot;
pub mod property;
pub mod render;
pub mod sampler;
pub mod style;
pub mod trace;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use clock::{Clock, Frame, FrameScheduler, FrameTarget, PlayState, SharedClock};
pub use error::{PlotError, Result};
pub use geom::{PixelPoint, Point};
pub use plot::{PlotSurface, SurfaceBuilder, SurfaceConfig, SurfaceRegistry};
pub use property::{
    Axes, Primitive, Value, ValueType, validate_array, validate_axes_pair, validate_choice,
    validate_positive, validate_single,
};
pub use render::{DrawCommand, DrawList, Marker, dash_run, glyph_segments};
pub use sampler::{
    Abscissa, CurveFn, Ordinate, SampleParams, Sampler, Samples, Segments, TimeFn, TraceKind,
    curve, time_fn,
};
pub use style::{Colour, LineStyle, MarkerShape, MarkerStyle, TraceStyle};
pub use trace::{Trace, TraceData, TraceOptions, TraceProperties};
pub use transform::Transform;
pub use view::{Origin, Range, ResizePolicy, Viewport, ViewportOptions};

#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiPlotView, SurfaceHandle};
