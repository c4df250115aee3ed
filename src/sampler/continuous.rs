//! Adaptive sampling of `y = f(x, t)` across the visible x range.
//!
//! The walk alternates between two phases:
//!
//! - **seek**: skip samples that are undefined or outside the visible y
//!   range. When the function comes back into range, first yield the sample
//!   one step earlier so the line reaches the boundary it crossed.
//! - **emit**: yield samples while they stay in range. The first sample that
//!   leaves the range is still yielded, then the walk returns to seek.
//!
//! Undefined (`NaN`) samples are never yielded. Every `x` stays within the
//! visible x range.

use crate::geom::Point;
use crate::view::Range;

use super::{CurveFn, SampleParams, clamp_safe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Seek,
    Emit,
    Done,
}

pub(crate) struct ContinuousSamples<'a> {
    f: &'a CurveFn,
    time: f64,
    x_min: f64,
    step: f64,
    y_lims: Range,
    last: usize,
    index: usize,
    phase: Phase,
    fresh_run: bool,
    starts_run: bool,
}

impl<'a> ContinuousSamples<'a> {
    pub(crate) fn new(f: &'a CurveFn, params: &SampleParams) -> Self {
        let last = params.last_index(params.x_lims);
        Self {
            f,
            time: params.time,
            x_min: params.x_lims.min,
            step: params.step,
            y_lims: params.y_lims,
            last: last.unwrap_or(0),
            index: 0,
            phase: if last.is_some() { Phase::Seek } else { Phase::Done },
            fresh_run: true,
            starts_run: false,
        }
    }

    pub(crate) fn starts_run(&self) -> bool {
        self.starts_run
    }

    fn x_at(&self, index: usize) -> f64 {
        self.x_min + index as f64 * self.step
    }

    fn y_at(&self, index: usize) -> f64 {
        (self.f)(self.x_at(index), self.time)
    }

    fn visible(&self, y: f64) -> bool {
        !y.is_nan() && self.y_lims.contains(y)
    }

    fn point(&mut self, index: usize, y: f64) -> Point {
        self.starts_run = std::mem::take(&mut self.fresh_run);
        Point::new(self.x_at(index), clamp_safe(y))
    }
}

impl Iterator for ContinuousSamples<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        loop {
            match self.phase {
                Phase::Done => return None,
                Phase::Seek => {
                    let mut skipped = false;
                    loop {
                        if self.index > self.last {
                            self.phase = Phase::Done;
                            return None;
                        }
                        if self.visible(self.y_at(self.index)) {
                            break;
                        }
                        self.index += 1;
                        skipped = true;
                    }
                    self.phase = Phase::Emit;
                    self.fresh_run = true;
                    if skipped {
                        let previous = self.index - 1;
                        let y = self.y_at(previous);
                        if !y.is_nan() {
                            return Some(self.point(previous, y));
                        }
                    }
                }
                Phase::Emit => {
                    if self.index > self.last {
                        self.phase = Phase::Done;
                        return None;
                    }
                    let index = self.index;
                    let y = self.y_at(index);
                    if self.visible(y) {
                        self.index += 1;
                        return Some(self.point(index, y));
                    }
                    // The sample that ends the run is re-examined by seek.
                    self.phase = Phase::Seek;
                    if !y.is_nan() {
                        return Some(self.point(index, y));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Sampler, curve};
    use super::*;

    fn sample(f: CurveFn, x: (f64, f64), y: (f64, f64), step: f64) -> Vec<Vec<Point>> {
        let sampler = Sampler::continuous(f).expect("numeric");
        let params = SampleParams::new(0.0, Range::new(x.0, x.1), Range::new(y.0, y.1), step);
        sampler.sample(&params).segments().collect()
    }

    fn xs(run: &[Point]) -> Vec<f64> {
        run.iter().map(|point| point.x).collect()
    }

    #[test]
    fn run_extends_one_step_past_the_top() {
        let runs = sample(curve(|x, _| x), (0.0, 10.0), (-5.0, 5.0), 1.0);
        assert_eq!(runs.len(), 1);
        assert_eq!(xs(&runs[0]), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn run_starts_one_step_before_entering() {
        let runs = sample(curve(|x, _| x), (-10.0, 0.0), (-5.0, 5.0), 1.0);
        assert_eq!(runs.len(), 1);
        assert_eq!(xs(&runs[0]), vec![-6.0, -5.0, -4.0, -3.0, -2.0, -1.0, 0.0]);
    }

    #[test]
    fn gaps_split_runs() {
        // Tangent-like spikes: out of range around x = 3 only.
        let runs = sample(
            curve(|x, _| if (x - 3.0).abs() < 0.5 { 100.0 } else { 0.0 }),
            (0.0, 6.0),
            (-1.0, 1.0),
            1.0,
        );
        assert_eq!(runs.len(), 2);
        assert_eq!(xs(&runs[0]), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(xs(&runs[1]), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn undefined_samples_are_skipped() {
        let runs = sample(curve(|x, _| x.sqrt()), (-2.0, 2.0), (-5.0, 5.0), 1.0);
        assert_eq!(runs.len(), 1);
        assert_eq!(xs(&runs[0]), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn never_in_range_yields_nothing() {
        let runs = sample(curve(|_, _| 50.0), (0.0, 10.0), (-5.0, 5.0), 0.5);
        assert!(runs.is_empty());
    }

    #[test]
    fn asymptotes_are_clamped() {
        let runs = sample(
            curve(|x, _| if x == 0.0 { f64::INFINITY } else { 1.0 }),
            (-1.0, 1.0),
            (-5.0, 5.0),
            1.0,
        );
        let flat: Vec<Point> = runs.into_iter().flatten().collect();
        assert!(flat.iter().all(|point| point.y.is_finite()));
        assert!(flat.contains(&Point::new(0.0, super::super::MAX_SAFE_VALUE)));
    }

    #[test]
    fn x_never_leaves_visible_range() {
        let runs = sample(curve(|x, _| x.sin()), (-3.0, 3.0), (-2.0, 2.0), 0.7);
        for point in runs.into_iter().flatten() {
            assert!((-3.0..=3.0).contains(&point.x));
        }
    }
}
