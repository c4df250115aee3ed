use gpui::{BorderStyle, Bounds, Corners, Edges, PathBuilder, Pixels, Point, Window, point, px, quad};

use crate::geom::PixelPoint;
use crate::render::{DrawCommand, DrawList, Marker, dash_run, glyph_segments};
use crate::style::{Colour, LineStyle, MarkerShape, MarkerStyle};

pub(crate) fn paint_draw_list(list: &DrawList, offset: Point<Pixels>, window: &mut Window) {
    let origin = list.origin();
    let shift = PixelPoint::new(f32::from(offset.x) + origin.x, f32::from(offset.y) + origin.y);
    for command in list.commands() {
        match command {
            DrawCommand::Polyline { runs, style, .. } => {
                paint_polyline(window, runs, *style, shift);
            }
            DrawCommand::Markers { markers, style, .. } => {
                paint_markers(window, markers, *style, shift);
            }
        }
    }
}

fn paint_polyline(window: &mut Window, runs: &[Vec<PixelPoint>], style: LineStyle, shift: PixelPoint) {
    let pattern = style.style.dash_pattern(style.width);
    let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
    let mut empty = true;
    for run in runs {
        for piece in dash_run(run, &pattern) {
            let mut vertices = piece.iter().map(|vertex| to_point(vertex.offset(shift)));
            let Some(first) = vertices.next() else {
                continue;
            };
            builder.move_to(first);
            for vertex in vertices {
                builder.line_to(vertex);
            }
            empty = false;
        }
    }
    if empty {
        return;
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.colour));
    }
}

fn paint_markers(window: &mut Window, markers: &[Marker], style: MarkerStyle, shift: PixelPoint) {
    if markers.is_empty() {
        return;
    }
    let size = style.size.max(2.0);
    if style.shape == MarkerShape::Circle {
        let radius = size * 0.5;
        for marker in markers {
            let centre = marker.position.offset(shift);
            let bounds = Bounds::from_corners(
                point(px(centre.x - radius), px(centre.y - radius)),
                point(px(centre.x + radius), px(centre.y + radius)),
            );
            window.paint_quad(quad(
                bounds,
                Corners::all(px(radius)),
                to_rgba(style.colour),
                Edges::all(px(0.0)),
                to_rgba(style.colour),
                BorderStyle::default(),
            ));
        }
        return;
    }

    let mut builder = PathBuilder::stroke(px(1.0));
    for marker in markers {
        for [start, end] in glyph_segments(marker, style.shape, size) {
            builder.move_to(to_point(start.offset(shift)));
            builder.line_to(to_point(end.offset(shift)));
        }
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.colour));
    }
}

fn to_point(pixel: PixelPoint) -> Point<Pixels> {
    point(px(pixel.x), px(pixel.y))
}

fn to_rgba(colour: Colour) -> gpui::Rgba {
    gpui::Rgba {
        r: colour.r,
        g: colour.g,
        b: colour.b,
        a: colour.a,
    }
}

pub(crate) fn to_hsla(colour: Colour) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(colour))
}
