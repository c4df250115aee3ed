//! Rendering instructions.
//!
//! These types are backend-agnostic and are produced by
//! [`PlotSurface::redraw`](crate::plot::PlotSurface::redraw). Render backends
//! (such as the GPUI backend) translate their drawing surface by
//! [`DrawList::origin`] once and then draw every command as-is.

use crate::geom::{PixelPoint, Point};
use crate::style::{LineStyle, MarkerShape, MarkerStyle, TraceStyle};
use crate::transform::Transform;

/// A marker instruction in origin-relative pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Marker centre.
    pub position: PixelPoint,
    /// Rotation in radians; `None` draws the glyph unrotated.
    pub orientation: Option<f32>,
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Connecting line of a trace.
    Polyline {
        /// Trace id.
        trace: String,
        /// Unbroken vertex runs; a renderer starts a new sub-path per run.
        runs: Vec<Vec<PixelPoint>>,
        /// Stroke styling, including the dash style.
        style: LineStyle,
    },
    /// Markers of a trace.
    Markers {
        /// Trace id.
        trace: String,
        /// Marker instructions in emission order.
        markers: Vec<Marker>,
        /// Marker styling.
        style: MarkerStyle,
    },
}

impl DrawCommand {
    /// Id of the trace that produced this command.
    pub fn trace(&self) -> &str {
        match self {
            Self::Polyline { trace, .. } | Self::Markers { trace, .. } => trace,
        }
    }
}

/// Ordered draw commands for one redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    origin: PixelPoint,
    time: f64,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Create an empty draw list.
    pub fn new(origin: PixelPoint, time: f64) -> Self {
        Self {
            origin,
            time,
            commands: Vec::new(),
        }
    }

    /// Push a draw command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Translation to apply to the drawing surface before drawing.
    pub fn origin(&self) -> PixelPoint {
        self.origin
    }

    /// Time the list was sampled at.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Access all draw commands.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Check whether nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Map sampled runs to origin-relative pixel runs.
pub(crate) fn build_polyline(
    runs: impl Iterator<Item = Vec<Point>>,
    transform: &Transform,
) -> Vec<Vec<PixelPoint>> {
    runs.map(|run| run.into_iter().map(|point| transform.to_pixel(point)).collect())
        .filter(|run: &Vec<PixelPoint>| !run.is_empty())
        .collect()
}

/// Map sampled points to marker instructions.
///
/// Only arrows carry an orientation.
pub(crate) fn build_markers(
    points: impl Iterator<Item = Point>,
    transform: &Transform,
    shape: MarkerShape,
) -> Vec<Marker> {
    let mut previous: Option<PixelPoint> = None;
    points
        .map(|point| {
            let position = transform.to_pixel(point);
            let orientation = match (shape, previous) {
                (MarkerShape::Arrow, Some(previous)) => arrow_orientation(previous, position),
                _ => None,
            };
            previous = Some(position);
            Marker {
                position,
                orientation,
            }
        })
        .collect()
}

/// Heading of the segment `from -> to`, or `None` when the points coincide.
pub(crate) fn arrow_orientation(from: PixelPoint, to: PixelPoint) -> Option<f32> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(dy.atan2(-dx))
}

/// Whether a line style draws anything.
pub(crate) fn draws_line(style: &LineStyle) -> bool {
    style.style != TraceStyle::None
}

/// Split a vertex run into the "on" pieces of a dash pattern.
///
/// `pattern` alternates on/off lengths in pixels, starting with "on". An
/// empty pattern returns the run unchanged.
pub fn dash_run(run: &[PixelPoint], pattern: &[f32]) -> Vec<Vec<PixelPoint>> {
    if pattern.is_empty() || pattern.iter().sum::<f32>() <= 0.0 {
        return vec![run.to_vec()];
    }
    let mut dashes = Vec::new();
    let mut index = 0;
    let mut remaining = pattern[0];
    let mut on = true;
    let mut current: Vec<PixelPoint> = run.first().map(|first| vec![*first]).unwrap_or_default();
    for pair in run.windows(2) {
        let (mut from, to) = (pair[0], pair[1]);
        let mut length = distance(from, to);
        while length > remaining {
            let split = lerp(from, to, remaining / length);
            if on {
                current.push(split);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![split];
            }
            on = !on;
            index = (index + 1) % pattern.len();
            remaining = pattern[index];
            from = split;
            length = distance(from, to);
        }
        remaining -= length;
        if on {
            current.push(to);
        }
    }
    if on && current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

/// Stroke segments of a line-drawn marker glyph.
///
/// Circles are filled rather than stroked and yield no segments. Arrows point
/// along the trace; an arrow without orientation points right.
pub fn glyph_segments(marker: &Marker, shape: MarkerShape, size: f32) -> Vec<[PixelPoint; 2]> {
    let centre = marker.position;
    let half = size * 0.5;
    let at = |dx: f32, dy: f32| PixelPoint::new(centre.x + dx, centre.y + dy);
    match shape {
        MarkerShape::Plus => vec![[at(-half, 0.0), at(half, 0.0)], [at(0.0, -half), at(0.0, half)]],
        MarkerShape::Cross => vec![
            [at(-half, -half), at(half, half)],
            [at(-half, half), at(half, -half)],
        ],
        MarkerShape::Arrow => {
            let heading = marker
                .orientation
                .map_or(0.0, |orientation| std::f32::consts::PI - orientation);
            let barb = |angle: f32| at(-size * angle.cos(), -size * angle.sin());
            let spread = std::f32::consts::FRAC_PI_6;
            vec![
                [centre, barb(heading - spread)],
                [centre, barb(heading + spread)],
            ]
        }
        MarkerShape::Circle | MarkerShape::None => Vec::new(),
    }
}

fn distance(from: PixelPoint, to: PixelPoint) -> f32 {
    (to.x - from.x).hypot(to.y - from.y)
}

fn lerp(from: PixelPoint, to: PixelPoint, t: f32) -> PixelPoint {
    PixelPoint::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}
