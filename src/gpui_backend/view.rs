use std::sync::{Arc, MutexGuard, PoisonError, RwLock};
use std::time::Instant;

use gpui::prelude::*;
use gpui::{Window, canvas, div};

use crate::clock::{Clock, FrameScheduler, SharedClock};
use crate::error::Result;
use crate::plot::PlotSurface;
use crate::style::Colour;

use super::paint::{paint_draw_list, to_hsla};

/// A GPUI view that renders a [`PlotSurface`].
///
/// The surface is resized to the canvas bounds on every frame. With a clock
/// attached, the view redraws at its object's elapsed time and keeps
/// requesting animation frames while the object is playing.
///
/// Use [`GpuiPlotView::start`] and friends to control playback. Code that
/// starts the object on the shared clock directly must call `cx.notify()` on
/// the view afterwards, since an idle view requests no frames.
#[derive(Clone)]
pub struct GpuiPlotView {
    surface: Arc<RwLock<PlotSurface>>,
    animation: Option<Animation>,
    background: Colour,
}

#[derive(Clone)]
struct Animation {
    clock: SharedClock,
    id: String,
}

impl GpuiPlotView {
    /// Create a new GPUI view for the given surface.
    pub fn new(surface: PlotSurface) -> Self {
        Self {
            surface: Arc::new(RwLock::new(surface)),
            animation: None,
            background: Colour::WHITE,
        }
    }

    /// Drive redraws from `clock` using the elapsed time of object `id`.
    ///
    /// The object must be registered with the clock separately.
    pub fn with_clock(mut self, clock: SharedClock, id: impl Into<String>) -> Self {
        self.animation = Some(Animation {
            clock,
            id: id.into(),
        });
        self
    }

    /// Set the background colour.
    pub fn with_background(mut self, colour: Colour) -> Self {
        self.background = colour;
        self
    }

    /// Get a handle for mutating the underlying surface.
    pub fn surface_handle(&self) -> SurfaceHandle {
        SurfaceHandle {
            surface: Arc::clone(&self.surface),
        }
    }

    /// Start (or resume) the view's clock object and wake the view.
    ///
    /// Does nothing without a clock.
    pub fn start(&mut self, cx: &mut Context<Self>) -> Result<()> {
        self.control(cx, |clock, id| clock.start(id, Instant::now()))
    }

    /// Pause the view's clock object.
    pub fn pause(&mut self, cx: &mut Context<Self>) -> Result<()> {
        self.control(cx, |clock, id| clock.pause(id, Instant::now()))
    }

    /// Resume the view's clock object and wake the view.
    pub fn resume(&mut self, cx: &mut Context<Self>) -> Result<()> {
        self.control(cx, |clock, id| clock.resume(id, Instant::now()))
    }

    /// Stop the view's clock object and redraw it at t = 0.
    pub fn stop(&mut self, cx: &mut Context<Self>) -> Result<()> {
        self.control(cx, |clock, id| clock.stop(id))
    }

    fn control(
        &mut self,
        cx: &mut Context<Self>,
        apply: impl FnOnce(&mut Clock, &str) -> Result<()>,
    ) -> Result<()> {
        let Some(animation) = &self.animation else {
            return Ok(());
        };
        apply(&mut animation.lock(), &animation.id)?;
        cx.notify();
        Ok(())
    }
}

impl Animation {
    fn lock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Elapsed time of the object, scheduling another frame while it plays.
    fn frame_time(&self, window: &Window) -> f64 {
        let mut clock = self.lock();
        let elapsed = match clock.frame(&self.id, Instant::now()) {
            Ok(frame) => frame.elapsed,
            Err(err) => {
                log::warn!("{err}; drawing at t = 0");
                return 0.0;
            }
        };
        if let Err(err) = clock.schedule_object(&self.id, &mut WindowFrames(window)) {
            log::warn!("{err}");
        }
        elapsed
    }
}

struct WindowFrames<'a>(&'a Window);

impl FrameScheduler for WindowFrames<'_> {
    fn request_frame(&mut self) {
        self.0.request_animation_frame();
    }
}

impl Render for GpuiPlotView {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let surface = Arc::clone(&self.surface);
        let animation = self.animation.clone();

        div().size_full().bg(to_hsla(self.background)).child(
            canvas(
                move |bounds, window, _| {
                    let time = animation
                        .as_ref()
                        .map_or(0.0, |animation| animation.frame_time(window));
                    let Ok(mut surface) = surface.write() else {
                        return None;
                    };
                    let width = f64::from(f32::from(bounds.size.width));
                    let height = f64::from(f32::from(bounds.size.height));
                    if let Err(err) = surface.resize(width, height) {
                        log::debug!("skipping resize: {err}");
                    }
                    Some(surface.redraw(time).clone())
                },
                move |bounds, list, window, _| {
                    if let Some(list) = list {
                        paint_draw_list(&list, bounds.origin, window);
                    }
                },
            )
            .size_full(),
        )
    }
}

/// A handle for mutating a [`PlotSurface`] held inside a `GpuiPlotView`.
///
/// The handle clones cheaply and can be moved into async tasks.
#[derive(Clone)]
pub struct SurfaceHandle {
    surface: Arc<RwLock<PlotSurface>>,
}

impl SurfaceHandle {
    /// Read the surface.
    ///
    /// Returns `None` if the lock is poisoned.
    pub fn read<R>(&self, f: impl FnOnce(&PlotSurface) -> R) -> Option<R> {
        let surface = self.surface.read().ok()?;
        Some(f(&surface))
    }

    /// Mutate the surface.
    ///
    /// Returns `None` if the lock is poisoned.
    pub fn write<R>(&self, f: impl FnOnce(&mut PlotSurface) -> R) -> Option<R> {
        let mut surface = self.surface.write().ok()?;
        Some(f(&mut surface))
    }
}
