//! GPUI integration for gpui_fnplot.
//!
//! This module provides a GPUI view that paints a
//! [`PlotSurface`](crate::plot::PlotSurface) and drives its redraws from a
//! shared [`Clock`](crate::clock::Clock).

mod paint;
mod view;

pub use view::{GpuiPlotView, SurfaceHandle};
