//! Plot surfaces and their registry.

use std::collections::BTreeMap;

use crate::clock::FrameTarget;
use crate::error::{PlotError, Result};
use crate::property::Value;
use crate::render::{DrawCommand, DrawList, build_markers, build_polyline, draws_line};
use crate::sampler::DEFAULT_MAX_SAMPLES;
use crate::style::MarkerShape;
use crate::trace::{Trace, TraceData, TraceOptions};
use crate::view::{Origin, ResizePolicy, Viewport, ViewportOptions};

/// Sampling configuration of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    /// Step in plot units for connecting lines.
    pub line_step: f64,
    /// Step in plot units for marker placement.
    pub marker_step: f64,
    /// Cap on the number of samples per sequence.
    pub max_samples: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            line_step: 0.01,
            marker_step: 0.001,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

/// A viewport plus the traces drawn on it.
///
/// Traces are kept in id order, which is also the draw order.
#[derive(Debug, Clone)]
pub struct PlotSurface {
    viewport: Viewport,
    traces: BTreeMap<String, Trace>,
    config: SurfaceConfig,
    dirty: bool,
    cache: Option<DrawList>,
}

impl PlotSurface {
    /// Create a surface with the default viewport.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        Self::builder().build(width, height)
    }

    /// Start building a surface with custom configuration.
    pub fn builder() -> SurfaceBuilder {
        SurfaceBuilder::default()
    }

    /// Access the viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Access the sampling configuration.
    pub fn config(&self) -> SurfaceConfig {
        self.config
    }

    /// Access a trace by id.
    pub fn trace(&self, id: &str) -> Option<&Trace> {
        self.traces.get(id)
    }

    /// Trace ids in draw order.
    pub fn trace_ids(&self) -> impl Iterator<Item = &str> {
        self.traces.keys().map(String::as_str)
    }

    /// Check whether the next redraw must resample.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Add a trace. Nothing changes if the id is taken or the data is invalid.
    pub fn add_trace(
        &mut self,
        id: impl Into<String>,
        data: impl Into<TraceData>,
        options: &TraceOptions,
    ) -> Result<()> {
        let id = id.into();
        if self.traces.contains_key(&id) {
            return Err(PlotError::DuplicateTraceId(id));
        }
        let trace = Trace::new(id.clone(), data.into(), options)?;
        log::debug!("added {:?} trace `{id}`", trace.kind());
        self.traces.insert(id, trace);
        self.dirty = true;
        Ok(())
    }

    /// Remove a trace. Removing an absent id is a no-op.
    pub fn remove_trace(&mut self, id: &str) -> Option<Trace> {
        let removed = self.traces.remove(id);
        if removed.is_some() {
            log::debug!("removed trace `{id}`");
            self.dirty = true;
        }
        removed
    }

    /// Apply several trace options atomically.
    pub fn update_trace(&mut self, id: &str, options: &TraceOptions) -> Result<()> {
        self.with_trace(id, |trace| trace.apply(options))
    }

    /// Set a trace's line colour.
    pub fn set_trace_colour(&mut self, id: &str, value: impl Into<Value>) -> Result<()> {
        self.with_trace(id, |trace| trace.set_trace_colour(value))
    }

    /// Set a trace's line style.
    pub fn set_trace_style(&mut self, id: &str, value: impl Into<Value>) -> Result<()> {
        self.with_trace(id, |trace| trace.set_trace_style(value))
    }

    /// Set a trace's line width.
    pub fn set_trace_width(&mut self, id: &str, value: impl Into<Value>) -> Result<()> {
        self.with_trace(id, |trace| trace.set_trace_width(value))
    }

    /// Set a trace's marker colour.
    pub fn set_marker_colour(&mut self, id: &str, value: impl Into<Value>) -> Result<()> {
        self.with_trace(id, |trace| trace.set_marker_colour(value))
    }

    /// Set a trace's marker style.
    pub fn set_marker_style(&mut self, id: &str, value: impl Into<Value>) -> Result<()> {
        self.with_trace(id, |trace| trace.set_marker_style(value))
    }

    /// Set a trace's marker size.
    pub fn set_marker_size(&mut self, id: &str, value: impl Into<Value>) -> Result<()> {
        self.with_trace(id, |trace| trace.set_marker_size(value))
    }

    /// Show or hide a trace.
    pub fn set_visibility(&mut self, id: &str, value: impl Into<Value>) -> Result<()> {
        self.with_trace(id, |trace| trace.set_visibility(value))
    }

    /// Set a parametric trace's parameter range.
    pub fn set_parameter_range(&mut self, id: &str, min: f64, max: f64) -> Result<()> {
        self.with_trace(id, |trace| trace.set_parameter_range(min, max))
    }

    /// Place the origin.
    pub fn set_origin(&mut self, origin: Origin) -> Result<()> {
        self.with_viewport(|viewport| viewport.set_origin(origin))
    }

    /// Set pixels per unit.
    pub fn set_scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.with_viewport(|viewport| viewport.set_scale(x, y))
    }

    /// Show exactly `[min, max]` horizontally.
    pub fn set_x_lims(&mut self, min: f64, max: f64) -> Result<()> {
        self.with_viewport(|viewport| viewport.set_x_lims(min, max))
    }

    /// Show exactly `[min, max]` vertically.
    pub fn set_y_lims(&mut self, min: f64, max: f64) -> Result<()> {
        self.with_viewport(|viewport| viewport.set_y_lims(min, max))
    }

    /// Apply viewport options atomically.
    pub fn apply_viewport(&mut self, options: &ViewportOptions) -> Result<()> {
        self.with_viewport(|viewport| viewport.apply(options))
    }

    /// React to a new surface size.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if width == self.viewport.width() && height == self.viewport.height() {
            return Ok(());
        }
        self.with_viewport(|viewport| viewport.resize(width, height))
    }

    /// Sample every visible trace at `time` and return the draw list.
    ///
    /// The previous list is reused when nothing changed since it was built.
    pub fn redraw(&mut self, time: f64) -> &DrawList {
        let fresh = !self.dirty
            && self
                .cache
                .as_ref()
                .is_some_and(|cached| cached.time() == time);
        if !fresh {
            self.cache = None;
        }
        self.dirty = false;
        let (viewport, traces, config) = (&self.viewport, &self.traces, self.config);
        self.cache
            .get_or_insert_with(|| build_draw_list(viewport, traces, config, time))
    }

    fn with_trace(&mut self, id: &str, update: impl FnOnce(&mut Trace) -> Result<()>) -> Result<()> {
        let trace = self
            .traces
            .get_mut(id)
            .ok_or_else(|| PlotError::UnknownTrace(id.to_owned()))?;
        update(trace)?;
        self.dirty = true;
        Ok(())
    }

    fn with_viewport(&mut self, update: impl FnOnce(&mut Viewport) -> Result<()>) -> Result<()> {
        update(&mut self.viewport)?;
        self.dirty = true;
        Ok(())
    }
}

fn build_draw_list(
    viewport: &Viewport,
    traces: &BTreeMap<String, Trace>,
    config: SurfaceConfig,
    time: f64,
) -> DrawList {
    let transform = viewport.transform();
    let mut list = DrawList::new(transform.origin(), time);
    for trace in traces.values().filter(|trace| trace.is_visible()) {
        let properties = trace.properties();
        if draws_line(&properties.line) {
            let samples = trace.sample(time, viewport, config.line_step, config.max_samples);
            let runs = build_polyline(samples.segments(), &transform);
            log::trace!(
                "trace `{}`: {} line vertices in {} runs",
                trace.id(),
                runs.iter().map(Vec::len).sum::<usize>(),
                runs.len()
            );
            list.push(DrawCommand::Polyline {
                trace: trace.id().to_owned(),
                runs,
                style: properties.line,
            });
        }
        if properties.marker.shape != MarkerShape::None {
            let samples = trace.sample(time, viewport, config.marker_step, config.max_samples);
            let markers = build_markers(samples, &transform, properties.marker.shape);
            log::trace!("trace `{}`: {} markers", trace.id(), markers.len());
            list.push(DrawCommand::Markers {
                trace: trace.id().to_owned(),
                markers,
                style: properties.marker,
            });
        }
    }
    list
}

/// Builder for configuring a surface before construction.
#[derive(Debug, Default)]
pub struct SurfaceBuilder {
    viewport: ViewportOptions,
    config: SurfaceConfig,
    resize_policy: ResizePolicy,
}

impl SurfaceBuilder {
    /// Set the initial viewport options.
    pub fn viewport(mut self, options: ViewportOptions) -> Self {
        self.viewport = options;
        self
    }

    /// Set the sampling configuration.
    pub fn config(mut self, config: SurfaceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set what a resize keeps fixed.
    pub fn resize_policy(mut self, policy: ResizePolicy) -> Self {
        self.resize_policy = policy;
        self
    }

    /// Build the surface.
    pub fn build(self, width: f64, height: f64) -> Result<PlotSurface> {
        let mut viewport = Viewport::new(width, height)?.with_resize_policy(self.resize_policy);
        viewport.apply(&self.viewport)?;
        Ok(PlotSurface {
            viewport,
            traces: BTreeMap::new(),
            config: self.config,
            dirty: true,
            cache: None,
        })
    }
}

/// Named surfaces that a [`Clock`](crate::clock::Clock) can redraw.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: BTreeMap<String, PlotSurface>,
}

impl SurfaceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a surface under `id`, returning the surface it replaced.
    pub fn attach(&mut self, id: impl Into<String>, surface: PlotSurface) -> Option<PlotSurface> {
        self.surfaces.insert(id.into(), surface)
    }

    /// Detach a surface.
    pub fn detach(&mut self, id: &str) -> Result<PlotSurface> {
        self.surfaces
            .remove(id)
            .ok_or_else(|| PlotError::ElementNotFound(id.to_owned()))
    }

    /// Access a surface.
    pub fn get(&self, id: &str) -> Result<&PlotSurface> {
        self.surfaces
            .get(id)
            .ok_or_else(|| PlotError::ElementNotFound(id.to_owned()))
    }

    /// Access a surface mutably.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut PlotSurface> {
        self.surfaces
            .get_mut(id)
            .ok_or_else(|| PlotError::ElementNotFound(id.to_owned()))
    }

    /// Attached ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }
}

impl FrameTarget for SurfaceRegistry {
    fn frame(&mut self, id: &str, elapsed: f64) -> Result<()> {
        self.get_mut(id)?.redraw(elapsed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::PixelPoint;
    use crate::style::TraceStyle;

    fn parabola() -> TraceData {
        TraceData::function(|x, _| x * x)
    }

    fn polyline(list: &DrawList) -> &[Vec<PixelPoint>] {
        list.commands()
            .iter()
            .find_map(|command| match command {
                DrawCommand::Polyline { runs, .. } => Some(runs.as_slice()),
                DrawCommand::Markers { .. } => None,
            })
            .expect("polyline")
    }

    #[test]
    fn parabola_passes_through_unit_point() {
        let options = ViewportOptions::new().scale(50.0).origin([250.0, 250.0]);
        let mut surface = PlotSurface::builder()
            .viewport(options)
            .build(500.0, 500.0)
            .expect("valid viewport");
        surface
            .add_trace("p", parabola(), &TraceOptions::new())
            .expect("valid trace");

        let list = surface.redraw(0.0);
        assert_eq!(list.origin(), PixelPoint::new(250.0, 250.0));
        let hit = polyline(list).iter().flatten().any(|pixel| {
            (pixel.x - 50.0).abs() < 1e-3 && (pixel.y + 50.0).abs() < 1e-3
        });
        assert!(hit);
    }

    #[test]
    fn duplicate_ids_leave_the_first_trace() {
        let mut surface = PlotSurface::new(100.0, 100.0).expect("valid size");
        surface
            .add_trace("t", parabola(), &TraceOptions::new().trace_width(3.0))
            .expect("valid trace");
        let err = surface
            .add_trace("t", TraceData::pair([1.0], [2.0]), &TraceOptions::new())
            .expect_err("duplicate id");
        assert_eq!(err, PlotError::DuplicateTraceId("t".into()));
        let trace = surface.trace("t").expect("still present");
        assert_eq!(trace.properties().line.width, 3.0);
    }

    #[test]
    fn failed_add_does_not_mutate() {
        let mut surface = PlotSurface::new(100.0, 100.0).expect("valid size");
        surface.redraw(0.0);
        let result = surface.add_trace(
            "t",
            TraceData::pair([1.0, 2.0, 3.0], [1.0, 2.0]),
            &TraceOptions::new(),
        );
        assert!(result.is_err());
        assert!(surface.trace("t").is_none());
        assert!(!surface.is_dirty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut surface = PlotSurface::new(100.0, 100.0).expect("valid size");
        surface
            .add_trace("t", parabola(), &TraceOptions::new())
            .expect("valid trace");
        assert!(surface.remove_trace("t").is_some());
        assert!(surface.remove_trace("t").is_none());
        assert_eq!(surface.trace_ids().count(), 0);
    }

    #[test]
    fn setters_mark_dirty_only_on_success() {
        let mut surface = PlotSurface::new(100.0, 100.0).expect("valid size");
        surface
            .add_trace("t", parabola(), &TraceOptions::new())
            .expect("valid trace");
        surface.redraw(0.0);
        assert!(!surface.is_dirty());

        assert!(surface.set_trace_style("t", "squiggle").is_err());
        assert!(surface.set_x_lims(1.0, -1.0).is_err());
        assert!(surface.set_x_lims(-1e308, 1e308).is_err());
        assert!(surface.set_origin(Origin::At(f64::NAN, 0.0)).is_err());
        assert!(!surface.is_dirty());
        assert_eq!(
            surface.set_trace_colour("u", "red"),
            Err(PlotError::UnknownTrace("u".into()))
        );

        surface.set_trace_style("t", "dashed").expect("valid choice");
        assert!(surface.is_dirty());
        assert_eq!(
            surface.trace("t").expect("present").properties().line.style,
            TraceStyle::Dashed
        );
    }

    #[test]
    fn hidden_and_styleless_traces_are_skipped() {
        let mut surface = PlotSurface::new(100.0, 100.0).expect("valid size");
        surface
            .add_trace("a", parabola(), &TraceOptions::new().visibility(false))
            .expect("valid trace");
        surface
            .add_trace(
                "b",
                TraceData::pair([0.0, 0.5], [0.0, 0.5]),
                &TraceOptions::new().trace_style("none").marker_style("circle"),
            )
            .expect("valid trace");

        let list = surface.redraw(0.0);
        assert_eq!(list.commands().len(), 1);
        assert!(matches!(
            &list.commands()[0],
            DrawCommand::Markers { trace, markers, .. } if trace == "b" && markers.len() == 2
        ));
    }

    #[test]
    fn draw_order_follows_ids() {
        let mut surface = PlotSurface::new(100.0, 100.0).expect("valid size");
        for id in ["c", "a", "b"] {
            surface
                .add_trace(id, parabola(), &TraceOptions::new())
                .expect("valid trace");
        }
        let order: Vec<&str> = surface
            .redraw(0.0)
            .commands()
            .iter()
            .map(DrawCommand::trace)
            .collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn redraw_reuses_the_cached_list() {
        let mut surface = PlotSurface::new(100.0, 100.0).expect("valid size");
        surface
            .add_trace("t", TraceData::function(|x, t| x + t), &TraceOptions::new())
            .expect("valid trace");
        let first = surface.redraw(0.0).clone();
        assert_eq!(surface.redraw(0.0), &first);
        assert_ne!(surface.redraw(0.5), &first);
    }

    #[test]
    fn registry_redraws_attached_surfaces() {
        let mut registry = SurfaceRegistry::new();
        registry.attach("main", PlotSurface::new(100.0, 100.0).expect("valid size"));
        registry.frame("main", 1.5).expect("attached");
        assert!(!registry.get("main").expect("attached").is_dirty());
        assert_eq!(
            registry.frame("other", 0.0),
            Err(PlotError::ElementNotFound("other".into()))
        );
        registry.detach("main").expect("attached");
        assert!(registry.get("main").is_err());
    }
}
