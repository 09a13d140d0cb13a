//! Fitting planar point sequences.
//!
//! Two ways of turning points into a curve:
//!
//! - graph: treat the sequence as samples of `y = f(x)` and fit `f` directly
//! - parametric: parametrize the sequence to `t ∈ [0, 1]`, then fit `x(t)`
//!   and `y(t)` independently against the same parameter vector

use crate::domain::{FitMethod, ParamKind, Point, point};
use crate::error::FitError;
use crate::fit::linear::fit;
use crate::models::FitModel;
use crate::param::parametrize;

/// Two coordinate models sharing one parametrization.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricFit {
    param: ParamKind,
    t: Vec<f64>,
    x: FitModel,
    y: FitModel,
}

impl ParametricFit {
    pub fn param_kind(&self) -> ParamKind {
        self.param
    }

    /// Parameter value of each input point.
    pub fn parameters(&self) -> &[f64] {
        &self.t
    }

    pub fn x_model(&self) -> &FitModel {
        &self.x
    }

    pub fn y_model(&self) -> &FitModel {
        &self.y
    }

    /// Position on the fitted curve at parameter `t`.
    pub fn eval(&self, t: f64) -> Point {
        point(self.x.predict(t), self.y.predict(t))
    }
}

/// Fit `x(t)` and `y(t)` for the given points.
pub fn fit_parametric(
    method: &FitMethod,
    param: ParamKind,
    points: &[Point],
) -> Result<ParametricFit, FitError> {
    let t = parametrize(param, points)?;
    let (xs, ys) = split_axes(points);
    let x = fit(method, &t, &xs)?;
    let y = fit(method, &t, &ys)?;
    log::debug!(
        "parametric {} fit over {} points ({} parametrization)",
        method.display_name(),
        points.len(),
        param.display_name()
    );
    Ok(ParametricFit { param, t, x, y })
}

/// Fit `y` as a function of `x`.
pub fn fit_graph(method: &FitMethod, points: &[Point]) -> Result<FitModel, FitError> {
    let (xs, ys) = split_axes(points);
    fit(method, &xs, &ys)
}

/// The `[min, max]` range of the points' x coordinates.
pub fn x_extent(points: &[Point]) -> Option<(f64, f64)> {
    points.iter().fold(None, |acc, p| {
        let x = p.x as f64;
        Some(match acc {
            None => (x, x),
            Some((lo, hi)) => (lo.min(x), hi.max(x)),
        })
    })
}

fn split_axes(points: &[Point]) -> (Vec<f64>, Vec<f64>) {
    points.iter().map(|p| (p.x as f64, p.y as f64)).unzip()
}
