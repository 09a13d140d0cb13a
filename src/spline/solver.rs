//! Natural cubic spline moment solve.
//!
//! For knots `t[0..n]` and values `y[0..n]` (one axis at a time):
//!
//! ```text
//! h[i] = t[i+1] - t[i]
//! u[i] = 2 (t[i+1] - t[i-1])
//! v[i] = 6/h[i] (y[i+1] - y[i]) - 6/h[i-1] (y[i] - y[i-1])
//! ```
//!
//! and the interior moments solve `h[i-1] M[i-1] + u[i] M[i] + h[i] M[i+1] = v[i]`
//! with the natural boundary `M[0] = M[n-1] = 0`. The relaxation starts from the
//! moments already stored in the `SplineState`.
//!
//! After every solve the one-sided derivatives at each knot are written back
//! into the state's tangent pairs, so the Hermite mode and handle editing
//! always start from the curve currently on screen.

use crate::domain::{Point, SolverOptions, Tangent};
use crate::error::FitError;
use crate::math::gauss_seidel;
use crate::spline::state::{SplineState, TangentPair};

/// Sweep counts of one moment solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveReport {
    pub knots: usize,
    pub sweeps_x: usize,
    pub sweeps_y: usize,
}

/// Knot spacings `h[i] = t[i+1] - t[i]`, all strictly positive.
pub fn knot_spacings(t: &[f64]) -> Result<Vec<f64>, FitError> {
    let mut h = Vec::with_capacity(t.len().saturating_sub(1));
    for (i, w) in t.windows(2).enumerate() {
        let d = w[1] - w[0];
        if !(d > 0.0 && d.is_finite()) {
            return Err(FitError::DegenerateParametrization { index: i });
        }
        h.push(d);
    }
    Ok(h)
}

/// Solve the moments for `points` at parameters `t`, updating `state` in place.
///
/// `state` is resized to the number of points first; slots that survive keep
/// their previous moments as the starting iterate. On failure the moments of
/// the failing axis are reset to zero so a poisoned iterate never seeds the
/// next solve.
pub fn solve_moments(
    points: &[Point],
    t: &[f64],
    state: &mut SplineState,
    opts: &SolverOptions,
) -> Result<SolveReport, FitError> {
    let n = points.len();
    if t.len() != n {
        return Err(FitError::ShapeMismatch {
            expected: n,
            actual: t.len(),
        });
    }
    state.resize(n);
    let mut report = SolveReport {
        knots: n,
        ..SolveReport::default()
    };
    if n < 2 {
        let (mx, my) = state.moments_mut();
        mx.fill(0.0);
        my.fill(0.0);
        state.tangents_mut().fill(TangentPair::default());
        return Ok(report);
    }

    let h = knot_spacings(t)?;
    let xs: Vec<f64> = points.iter().map(|p| p.x as f64).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y as f64).collect();

    let (mx, my) = state.moments_mut();
    report.sweeps_x = relax_axis(&h, t, &xs, mx, opts)?;
    report.sweeps_y = relax_axis(&h, t, &ys, my, opts)?;
    log::debug!(
        "moment solve: {} knots, {} + {} sweeps",
        n,
        report.sweeps_x,
        report.sweeps_y
    );

    let fresh = knot_tangents(&h, &xs, &ys, state.moments_x(), state.moments_y());
    state.tangents_mut().copy_from_slice(&fresh);
    Ok(report)
}

/// Derivative leaving knot `i` along segment `i`.
pub fn outgoing_derivative(h: &[f64], y: &[f64], m: &[f64], i: usize) -> f64 {
    -m[i] * h[i] / 3.0 - m[i + 1] * h[i] / 6.0 + (y[i + 1] - y[i]) / h[i]
}

/// Derivative arriving at knot `i` along segment `i - 1`.
pub fn incoming_derivative(h: &[f64], y: &[f64], m: &[f64], i: usize) -> f64 {
    m[i - 1] * h[i - 1] / 6.0 + m[i] * h[i - 1] / 3.0 + (y[i] - y[i - 1]) / h[i - 1]
}

fn relax_axis(
    h: &[f64],
    t: &[f64],
    y: &[f64],
    m: &mut [f64],
    opts: &SolverOptions,
) -> Result<usize, FitError> {
    let n = y.len();
    m[0] = 0.0;
    m[n - 1] = 0.0;

    let mut u = vec![0.0; n];
    let mut v = vec![0.0; n];
    for i in 1..n - 1 {
        u[i] = 2.0 * (t[i + 1] - t[i - 1]);
        v[i] = 6.0 / h[i] * (y[i + 1] - y[i]) - 6.0 / h[i - 1] * (y[i] - y[i - 1]);
    }

    match gauss_seidel(h, &u, &v, m, opts) {
        Ok(sweeps) => Ok(sweeps),
        Err(err) => {
            m.fill(0.0);
            Err(err)
        }
    }
}

/// Both one-sided derivatives at every knot. End knots only have one side;
/// the missing one copies it.
fn knot_tangents(h: &[f64], xs: &[f64], ys: &[f64], mx: &[f64], my: &[f64]) -> Vec<TangentPair> {
    let n = xs.len();
    (0..n)
        .map(|i| {
            let outgoing = (i + 1 < n).then(|| {
                Tangent::new(
                    outgoing_derivative(h, xs, mx, i),
                    outgoing_derivative(h, ys, my, i),
                )
            });
            let incoming = (i > 0).then(|| {
                Tangent::new(
                    incoming_derivative(h, xs, mx, i),
                    incoming_derivative(h, ys, my, i),
                )
            });
            match (incoming, outgoing) {
                (Some(a), Some(b)) => TangentPair::new(a, b),
                (Some(a), None) => TangentPair::both(a),
                (None, Some(b)) => TangentPair::both(b),
                (None, None) => TangentPair::default(),
            }
        })
        .collect()
}
