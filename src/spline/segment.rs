//! Spline segment evaluation.
//!
//! A segment covers `[t[i], t[i+1]]` and is evaluated one of two ways:
//!
//! - natural: the moment blend
//!   `M0/(6h)·(t1-t)³ + M1/(6h)·(t-t0)³ + (y1/h - M1·h/6)·(t-t0) + (y0/h - M0·h/6)·(t1-t)`
//! - Hermite: the cubic matching both end values and the stored outgoing /
//!   incoming derivatives, found by a 4×4 solve per axis
//!
//! `SplineCurve` compiles all segments of one curve up front so sampling
//! does no solving.

use nalgebra::{DMatrix, DVector};

use crate::domain::{Point, SplineMode, point};
use crate::error::FitError;
use crate::math::{cubic, solve_square};
use crate::spline::solver::knot_spacings;
use crate::spline::state::SplineState;

/// Natural segment value at `t` for one axis.
pub fn natural_segment(t0: f64, t1: f64, y0: f64, y1: f64, m0: f64, m1: f64, t: f64) -> f64 {
    let h = t1 - t0;
    let a = t1 - t;
    let b = t - t0;
    m0 / (6.0 * h) * a * a * a
        + m1 / (6.0 * h) * b * b * b
        + (y1 / h - m1 * h / 6.0) * b
        + (y0 / h - m0 * h / 6.0) * a
}

/// Cubic coefficients (in the offset `s = t - t0`) with the given end values
/// and end derivatives.
///
/// The system is the usual Hermite one,
///
/// ```text
/// [1 0 0  0  ]       [y0]
/// [1 h h² h³ ] · a = [y1]
/// [0 1 0  0  ]       [d0]
/// [0 1 2h 3h²]       [d1]
/// ```
///
/// posed in the local offset so short segments near `t = 1` stay well
/// conditioned.
pub fn hermite_coefficients(
    t0: f64,
    t1: f64,
    y0: f64,
    y1: f64,
    d0: f64,
    d1: f64,
) -> Result<[f64; 4], FitError> {
    let h = t1 - t0;
    #[rustfmt::skip]
    let a = DMatrix::from_row_slice(4, 4, &[
        1.0, 0.0, 0.0,       0.0,
        1.0, h,   h * h,     h * h * h,
        0.0, 1.0, 0.0,       0.0,
        0.0, 1.0, 2.0 * h,   3.0 * h * h,
    ]);
    let b = DVector::from_row_slice(&[y0, y1, d0, d1]);
    let c = solve_square(&a, &b, "Hermite segment")?;
    Ok([c[0], c[1], c[2], c[3]])
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    Natural {
        x: [f64; 4],
        y: [f64; 4],
    },
    Hermite {
        x: [f64; 4],
        y: [f64; 4],
    },
}

/// One compiled segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    t0: f64,
    t1: f64,
    shape: Shape,
}

impl Segment {
    pub fn start(&self) -> f64 {
        self.t0
    }

    pub fn end(&self) -> f64 {
        self.t1
    }

    pub fn eval(&self, t: f64) -> Point {
        match &self.shape {
            // [y0, y1, m0, m1]
            Shape::Natural { x, y } => point(
                natural_segment(self.t0, self.t1, x[0], x[1], x[2], x[3], t),
                natural_segment(self.t0, self.t1, y[0], y[1], y[2], y[3], t),
            ),
            Shape::Hermite { x, y } => {
                let s = t - self.t0;
                point(cubic(x, s), cubic(y, s))
            }
        }
    }
}

/// A spline ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineCurve {
    mode: SplineMode,
    segments: Vec<Segment>,
}

impl SplineCurve {
    /// Compile a curve from points, their parameters and a solved state.
    ///
    /// Natural mode reads the moments, Hermite mode reads the tangent pairs.
    pub fn build(
        mode: SplineMode,
        points: &[Point],
        t: &[f64],
        state: &SplineState,
    ) -> Result<Self, FitError> {
        let n = points.len();
        if n < 2 {
            return Err(FitError::InsufficientPoints {
                required: 2,
                actual: n,
            });
        }
        for len in [t.len(), state.len()] {
            if len != n {
                return Err(FitError::ShapeMismatch {
                    expected: n,
                    actual: len,
                });
            }
        }
        knot_spacings(t)?;

        let mut segments = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            let (p0, p1) = (points[i], points[i + 1]);
            let shape = match mode {
                SplineMode::Natural => {
                    let (mx, my) = (state.moments_x(), state.moments_y());
                    Shape::Natural {
                        x: [p0.x as f64, p1.x as f64, mx[i], mx[i + 1]],
                        y: [p0.y as f64, p1.y as f64, my[i], my[i + 1]],
                    }
                }
                SplineMode::Hermite => {
                    let d0 = state.tangents()[i].outgoing;
                    let d1 = state.tangents()[i + 1].incoming;
                    Shape::Hermite {
                        x: hermite_coefficients(t[i], t[i + 1], p0.x as f64, p1.x as f64, d0.x, d1.x)?,
                        y: hermite_coefficients(t[i], t[i + 1], p0.y as f64, p1.y as f64, d0.y, d1.y)?,
                    }
                }
            };
            segments.push(Segment {
                t0: t[i],
                t1: t[i + 1],
                shape,
            });
        }
        Ok(Self { mode, segments })
    }

    pub fn mode(&self) -> SplineMode {
        self.mode
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Position at `t`, clamped to the curve's parameter range.
    pub fn eval(&self, t: f64) -> Point {
        let last = self.segments.len() - 1;
        let index = self
            .segments
            .partition_point(|s| s.t1 < t)
            .min(last);
        let seg = &self.segments[index];
        seg.eval(t.clamp(seg.t0, seg.t1))
    }
}
