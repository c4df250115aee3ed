//! Discrete maps and point lists: one point per element, in index order.

use crate::geom::Point;

use super::{Abscissa, CurveFn, Ordinate, SampleParams, clamp_safe};

enum Source<'a> {
    Map { xs: &'a [f64], f: &'a CurveFn },
    Points { xs: &'a [Abscissa], ys: &'a [Ordinate] },
}

pub(crate) struct DiscreteSamples<'a> {
    source: Source<'a>,
    time: f64,
    len: usize,
    index: usize,
    fresh_run: bool,
    starts_run: bool,
}

impl<'a> DiscreteSamples<'a> {
    pub(crate) fn map(xs: &'a [f64], f: &'a CurveFn, params: &SampleParams) -> Self {
        Self::new(Source::Map { xs, f }, xs.len(), params)
    }

    pub(crate) fn points(xs: &'a [Abscissa], ys: &'a [Ordinate], params: &SampleParams) -> Self {
        Self::new(Source::Points { xs, ys }, xs.len().min(ys.len()), params)
    }

    fn new(source: Source<'a>, len: usize, params: &SampleParams) -> Self {
        if len > params.max_samples {
            log::warn!(
                "drawing {} of {} discrete points, the cap is {}",
                params.max_samples,
                len,
                params.max_samples
            );
        }
        Self {
            source,
            time: params.time,
            len: len.min(params.max_samples),
            index: 0,
            fresh_run: true,
            starts_run: false,
        }
    }

    pub(crate) fn starts_run(&self) -> bool {
        self.starts_run
    }

    fn eval(&self, index: usize) -> Point {
        match &self.source {
            Source::Map { xs, f } => {
                let x = xs[index];
                Point::new(x, f(x, self.time))
            }
            Source::Points { xs, ys } => {
                let x = xs[index].eval(self.time);
                Point::new(x, ys[index].eval(x, self.time))
            }
        }
    }
}

impl Iterator for DiscreteSamples<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        while self.index < self.len {
            let point = self.eval(self.index);
            self.index += 1;
            if point.x.is_nan() || point.y.is_nan() {
                self.fresh_run = true;
                continue;
            }
            self.starts_run = std::mem::take(&mut self.fresh_run);
            return Some(Point::new(clamp_safe(point.x), clamp_safe(point.y)));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.len - self.index))
    }
}
