//! Curve sampling.
//!
//! Every sampler returns a `Samples` iterator: lazy (points are computed on
//! `next`), finite (never more than `MAX_PLOT_POINTS`), and restartable
//! (clone it, or call `restart`). Sample `i` is a pure function of `i`, so
//! two passes over the same sequence yield identical points.

use crate::domain::{Point, point};
use crate::error::FitError;
use crate::fit::ParametricFit;
use crate::models::FitModel;
use crate::spline::SplineCurve;

/// Upper bound on the length of any sample sequence.
pub const MAX_PLOT_POINTS: usize = 10_000;

/// Parameter step for parametric fits (`t = 0, 0.001, ..., 1`).
pub const PARAM_STEP: f64 = 0.001;

/// Lazy sample sequence; `at(i)` produces sample `i`.
#[derive(Debug, Clone)]
pub struct Samples<F> {
    at: F,
    len: usize,
    next: usize,
}

impl<F> Samples<F>
where
    F: Fn(usize) -> Point,
{
    fn new(len: usize, at: F) -> Self {
        Self {
            at,
            len: len.min(MAX_PLOT_POINTS),
            next: 0,
        }
    }

    /// Rewind to the first sample.
    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl<F> Iterator for Samples<F>
where
    F: Fn(usize) -> Point,
{
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next >= self.len {
            return None;
        }
        let p = (self.at)(self.next);
        self.next += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.len - self.next;
        (left, Some(left))
    }
}

impl<F> ExactSizeIterator for Samples<F> where F: Fn(usize) -> Point {}

/// Sample `y = model(x)` at `MAX_PLOT_POINTS` evenly spaced `x` covering
/// `[x_min, x_max]`; the first and last samples sit on the two ends.
pub fn sample_graph(
    model: &FitModel,
    x_min: f64,
    x_max: f64,
) -> Result<Samples<impl Fn(usize) -> Point + Clone + '_>, FitError> {
    if !(x_min.is_finite() && x_max.is_finite() && x_max > x_min) {
        return Err(FitError::invalid(
            "x range",
            format!("need finite x_min < x_max, got [{x_min}, {x_max}]"),
        ));
    }
    let last = MAX_PLOT_POINTS - 1;
    let step = (x_max - x_min) / last as f64;
    Ok(Samples::new(MAX_PLOT_POINTS, move |i| {
        let x = if i >= last { x_max } else { x_min + i as f64 * step };
        point(x, model.predict(x))
    }))
}

/// Sample a parametric fit at `t = i · PARAM_STEP` for `t` in `[0, 1]`.
pub fn sample_parametric(fit: &ParametricFit) -> Samples<impl Fn(usize) -> Point + Clone + '_> {
    let len = (1.0 / PARAM_STEP).round() as usize + 1;
    Samples::new(len, move |i| fit.eval(i as f64 * PARAM_STEP))
}

/// Sample a spline segment by segment in index order.
///
/// Segment `[t0, t1]` contributes `ceil((t1 - t0) / step)` samples starting
/// at `t0`; the curve's final knot closes the sequence.
pub fn sample_spline(
    curve: &SplineCurve,
    step: f64,
) -> Result<Samples<impl Fn(usize) -> Point + Clone + '_>, FitError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(FitError::invalid("step", format!("must be finite and > 0, got {step}")));
    }

    // offsets[k] = index of the first sample of segment k.
    let mut offsets = Vec::with_capacity(curve.segments().len() + 1);
    let mut total = 0usize;
    for seg in curve.segments() {
        offsets.push(total);
        let count = ((seg.end() - seg.start()) / step).ceil().max(1.0) as usize;
        total = total.saturating_add(count);
    }
    let closing = total;
    let end = curve.segments().last().map_or(0.0, |s| s.end());

    Ok(Samples::new(total + 1, move |i| {
        if i >= closing {
            return curve.eval(end);
        }
        let k = offsets.partition_point(|&o| o <= i) - 1;
        let seg = &curve.segments()[k];
        let t = (seg.start() + (i - offsets[k]) as f64 * step).min(seg.end());
        seg.eval(t)
    }))
}
