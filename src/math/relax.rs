//! Gauss-Seidel relaxation for the spline moment system.
//!
//! For knots `0..n` with spacings `h[i] = t[i+1] - t[i]`, every interior knot
//! contributes one equation
//!
//! ```text
//! h[i-1]·M[i-1] + u[i]·M[i] + h[i]·M[i+1] = v[i]        (0 < i < n-1)
//! ```
//!
//! with `M[0]` and `M[n-1]` held fixed. Because `u[i] = 2(h[i-1] + h[i])` the
//! matrix is strictly diagonally dominant and the sweep always contracts.
//! The iteration starts from whatever `M` already holds, so a caller that
//! keeps the previous solution gets very few sweeps after a small edit.

use crate::domain::SolverOptions;
use crate::error::FitError;

/// Relax `m` in place until the sweep-to-sweep change is below tolerance.
///
/// Slices are knot-indexed: `m`, `u` and `v` have length `n`, `h` has length
/// `n - 1`. Entries `u[0]`, `u[n-1]`, `v[0]` and `v[n-1]` are ignored.
///
/// Returns the number of sweeps performed. A failure reports the sweeps
/// actually run, which is fewer than `max_sweeps` when the iterate stops
/// being finite.
pub fn gauss_seidel(
    h: &[f64],
    u: &[f64],
    v: &[f64],
    m: &mut [f64],
    opts: &SolverOptions,
) -> Result<usize, FitError> {
    let n = m.len();
    if u.len() != n || v.len() != n {
        return Err(FitError::ShapeMismatch {
            expected: n,
            actual: u.len().min(v.len()),
        });
    }
    if n < 3 {
        // No interior knots: nothing to relax.
        return Ok(0);
    }
    if h.len() != n - 1 {
        return Err(FitError::ShapeMismatch {
            expected: n - 1,
            actual: h.len(),
        });
    }

    let mut prev = m.to_vec();
    let mut change = f64::INFINITY;
    let mut sweeps = 0;
    for sweep in 1..=opts.max_sweeps {
        sweeps = sweep;
        for i in 1..n - 1 {
            m[i] = (v[i] - h[i - 1] * m[i - 1] - h[i] * m[i + 1]) / u[i];
        }

        change = l2_distance(m, &prev);
        if !change.is_finite() {
            // Further sweeps cannot recover from NaN or overflow.
            break;
        }
        let scale = l2_norm(m).max(1.0);
        if change < opts.tolerance * scale {
            return Ok(sweep);
        }
        prev.copy_from_slice(m);
    }

    Err(FitError::NonConvergence { sweeps, change })
}

fn l2_norm(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
