//! Parametric curves `(x(p, t), y(p, t))`.

use crate::geom::Point;

use super::{CurveFn, SampleParams, clamp_safe};

/// Walks the parameter range in fixed steps and always finishes with one
/// point exactly at the upper bound. No clipping against the visible range.
pub(crate) struct ParametricSamples<'a> {
    x: &'a CurveFn,
    y: &'a CurveFn,
    time: f64,
    start: f64,
    end: f64,
    step: f64,
    last: Option<usize>,
    index: usize,
    tail_done: bool,
    fresh_run: bool,
    starts_run: bool,
}

impl<'a> ParametricSamples<'a> {
    pub(crate) fn new(x: &'a CurveFn, y: &'a CurveFn, params: &SampleParams) -> Self {
        let last = params.last_index(params.parameter_range);
        Self {
            x,
            y,
            time: params.time,
            start: params.parameter_range.min,
            end: params.parameter_range.max,
            step: params.step,
            last,
            index: 0,
            tail_done: last.is_none(),
            fresh_run: true,
            starts_run: false,
        }
    }

    pub(crate) fn starts_run(&self) -> bool {
        self.starts_run
    }

    fn eval(&mut self, parameter: f64) -> Option<Point> {
        let x = (self.x)(parameter, self.time);
        let y = (self.y)(parameter, self.time);
        if x.is_nan() || y.is_nan() {
            self.fresh_run = true;
            return None;
        }
        self.starts_run = std::mem::take(&mut self.fresh_run);
        Some(Point::new(clamp_safe(x), clamp_safe(y)))
    }
}

impl Iterator for ParametricSamples<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        while let Some(last) = self.last {
            if self.index > last {
                break;
            }
            let parameter = self.start + self.index as f64 * self.step;
            self.index += 1;
            if let Some(point) = self.eval(parameter) {
                return Some(point);
            }
        }
        if self.tail_done {
            return None;
        }
        self.tail_done = true;
        self.eval(self.end)
    }
}
