//! Parametrization schemes.
//!
//! Each scheme accumulates a per-step metric and normalizes by the total, so
//! the result always starts at 0 and ends at 1:
//!
//! - chord:       `t[i] - t[i-1] ∝ |p[i] - p[i-1]|`
//! - centripetal: `t[i] - t[i-1] ∝ sqrt(|p[i] - p[i-1]|)`
//! - uniform:     `t[i] = i / (n - 1)`
//! - Foley:       chord length inflated by the turning angles at both ends
//!   of the step (Foley-Nielson)
//!
//! Position-based schemes reject consecutive duplicates instead of dividing
//! by zero.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Vector2;

use crate::domain::{ParamKind, Point, coords};
use crate::error::FitError;

/// Parametrize `points` with the chosen scheme.
pub fn parametrize(kind: ParamKind, points: &[Point]) -> Result<Vec<f64>, FitError> {
    match kind {
        ParamKind::Chord => chord(points),
        ParamKind::Centripetal => centripetal(points),
        ParamKind::Uniform => Ok(uniform(points.len())),
        ParamKind::Foley => foley(points),
    }
}

/// Chord-length parametrization.
pub fn chord(points: &[Point]) -> Result<Vec<f64>, FitError> {
    accumulate(&step_lengths(points)?, |d| d)
}

/// Centripetal parametrization.
pub fn centripetal(points: &[Point]) -> Result<Vec<f64>, FitError> {
    accumulate(&step_lengths(points)?, f64::sqrt)
}

/// Uniform parametrization of `n` samples.
pub fn uniform(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|i| i as f64 / last).collect()
        }
    }
}

/// Foley-Nielson parametrization.
///
/// With `d[i] = |p[i+1] - p[i]|` and `α[i]` the exterior angle at knot `i`
/// (capped at π/2), each step is
///
/// ```text
/// d[i-1] · (1 + 1.5·α[i-1]·d[i-2]/(d[i-2]+d[i-1]) + 1.5·α[i]·d[i]/(d[i-1]+d[i]))
/// ```
///
/// where a term is dropped when its neighbor segment does not exist.
pub fn foley(points: &[Point]) -> Result<Vec<f64>, FitError> {
    let n = points.len();
    if n < 2 {
        return Ok(uniform(n));
    }
    if n == 2 {
        return Ok(vec![0.0, 1.0]);
    }

    let dist = step_lengths(points)?;
    let mut alpha = vec![0.0; n - 1];
    for (i, a) in alpha.iter_mut().enumerate().skip(1) {
        let back = coords(&points[i - 1]) - coords(&points[i]);
        let ahead = coords(&points[i + 1]) - coords(&points[i]);
        *a = exterior_angle(&back, &ahead);
    }

    let mut t = vec![0.0; n];
    for i in 1..n {
        // Step from knot i-1 to knot i covers segment i-1.
        let seg = i - 1;
        let mut factor = 1.0;
        if seg >= 1 {
            factor += 1.5 * alpha[seg] * dist[seg - 1] / (dist[seg - 1] + dist[seg]);
        }
        if seg + 1 < n - 1 {
            factor += 1.5 * alpha[seg + 1] * dist[seg + 1] / (dist[seg] + dist[seg + 1]);
        }
        t[i] = t[i - 1] + dist[seg] * factor;
    }
    normalize(t)
}

/// `min(π - θ, π/2)` where `θ` is the angle between `back` and `ahead`.
fn exterior_angle(back: &Vector2<f64>, ahead: &Vector2<f64>) -> f64 {
    let cos = (back.dot(ahead) / (back.norm() * ahead.norm())).clamp(-1.0, 1.0);
    (PI - cos.acos()).min(FRAC_PI_2)
}

fn step_lengths(points: &[Point]) -> Result<Vec<f64>, FitError> {
    let mut out = Vec::with_capacity(points.len().saturating_sub(1));
    for (i, w) in points.windows(2).enumerate() {
        let d = (coords(&w[1]) - coords(&w[0])).norm();
        if d == 0.0 || !d.is_finite() {
            return Err(FitError::DegenerateParametrization { index: i });
        }
        out.push(d);
    }
    Ok(out)
}

fn accumulate(steps: &[f64], metric: impl Fn(f64) -> f64) -> Result<Vec<f64>, FitError> {
    let mut t = Vec::with_capacity(steps.len() + 1);
    t.push(0.0);
    let mut acc = 0.0;
    for &d in steps {
        acc += metric(d);
        t.push(acc);
    }
    normalize(t)
}

fn normalize(mut t: Vec<f64>) -> Result<Vec<f64>, FitError> {
    if t.len() < 2 {
        return Ok(t);
    }
    let total = t[t.len() - 1];
    if !(total.is_finite() && total > 0.0) {
        return Err(FitError::DegenerateParametrization { index: 0 });
    }
    for v in t.iter_mut() {
        *v /= total;
    }
    // Division can land one ulp off; the endpoint is 1 by definition.
    if let Some(last) = t.last_mut() {
        *last = 1.0;
    }
    Ok(t)
}
