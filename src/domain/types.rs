//! Shared domain types.
//!
//! Points are stored as `f32` pairs (the exchange format with whatever draws
//! or edits them); everything derived from points (parameters, coefficients,
//! moments, tangents) is computed in `f64`.

use std::path::PathBuf;

use clap::ValueEnum;
use nalgebra::{Point2, Vector2};

/// A sample point in the plane.
pub type Point = Point2<f32>;

/// A derivative vector `(dx/dt, dy/dt)` at a knot.
pub type Tangent = Vector2<f64>;

/// Smallest polynomial order accepted by the approximation fits.
pub const MIN_ORDER: usize = 1;
/// Largest polynomial order accepted by the approximation fits.
pub const MAX_ORDER: usize = 50;

/// Build a `Point` from `f64` coordinates.
pub fn point(x: f64, y: f64) -> Point {
    Point2::new(x as f32, y as f32)
}

/// Widen a `Point` for numerical work.
pub fn coords(p: &Point) -> Vector2<f64> {
    Vector2::new(p.x as f64, p.y as f64)
}

/// Drop points equal to their predecessor.
///
/// Point streams coming from an editor carry "in-progress" duplicates (a point
/// is pushed twice and the second copy follows the cursor). Those must not
/// reach a parametrization, where they would produce a zero parameter step.
pub fn dedup_consecutive(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    out
}

/// Curve parametrization scheme.
///
/// The integer discriminants (`0..=3`) are part of the external contract;
/// see [`ParamKind::from_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ParamKind {
    /// Steps proportional to chord length.
    #[default]
    Chord,
    /// Steps proportional to the square root of chord length.
    Centripetal,
    /// Equal steps; positions are ignored.
    Uniform,
    /// Chord length corrected by the turning angle at each knot.
    Foley,
}

impl ParamKind {
    pub const ALL: [ParamKind; 4] = [
        ParamKind::Chord,
        ParamKind::Centripetal,
        ParamKind::Uniform,
        ParamKind::Foley,
    ];

    /// Select a scheme by discriminant. Unknown values fall back to chord.
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => ParamKind::Centripetal,
            2 => ParamKind::Uniform,
            3 => ParamKind::Foley,
            _ => ParamKind::Chord,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            ParamKind::Chord => 0,
            ParamKind::Centripetal => 1,
            ParamKind::Uniform => 2,
            ParamKind::Foley => 3,
        }
    }

    /// The next scheme in discriminant order, wrapping after Foley.
    pub fn next(self) -> Self {
        Self::from_index((self.index() as i64 + 1) % 4)
    }

    /// Whether the scheme divides by distances between consecutive points.
    pub fn uses_positions(self) -> bool {
        !matches!(self, ParamKind::Uniform)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ParamKind::Chord => "chord",
            ParamKind::Centripetal => "centripetal",
            ParamKind::Uniform => "uniform",
            ParamKind::Foley => "Foley",
        }
    }
}

/// Which linear-fit family to use (CLI selector, parameters come separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodKind {
    /// Polynomial interpolation through every point.
    Poly,
    /// Gaussian radial-basis interpolation.
    Gauss,
    /// Least-squares polynomial approximation.
    Ls,
    /// Ridge-regression polynomial approximation.
    Ridge,
}

/// A fully specified linear fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitMethod {
    /// Degree `n - 1` polynomial through all `n` points.
    Interpolation,
    /// Bias plus one Gaussian per point, width `sigma`.
    Gauss { sigma: f64 },
    /// Polynomial of `order` minimizing squared error.
    LeastSquares { order: usize },
    /// Least squares with an L2 penalty `lambda` on the coefficients.
    Ridge { order: usize, lambda: f64 },
}

impl FitMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            FitMethod::Interpolation => "polynomial interpolation",
            FitMethod::Gauss { .. } => "Gaussian-basis interpolation",
            FitMethod::LeastSquares { .. } => "least squares",
            FitMethod::Ridge { .. } => "ridge regression",
        }
    }
}

/// How editing one tangent handle at a knot affects the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TangentMode {
    /// Both handles stay mirror images (equal derivatives on both sides).
    #[default]
    Smooth,
    /// Handles stay collinear; the sibling keeps its own length.
    Straight,
    /// Handles are independent.
    Corner,
}

/// One of the two handles at a knot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSide {
    /// Derivative arriving at the knot (end of the previous segment).
    Incoming,
    /// Derivative leaving the knot (start of the next segment).
    Outgoing,
}

impl HandleSide {
    pub fn sibling(self) -> Self {
        match self {
            HandleSide::Incoming => HandleSide::Outgoing,
            HandleSide::Outgoing => HandleSide::Incoming,
        }
    }
}

/// How spline segments are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplineMode {
    /// Natural cubic spline from solved moments.
    #[default]
    Natural,
    /// Per-segment cubic Hermite from the stored tangent handles.
    Hermite,
}

/// Gauss-Seidel stopping rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Stop when the L2 change between sweeps falls below
    /// `tolerance * max(1, |M|)`.
    pub tolerance: f64,
    /// Give up with `NonConvergence` after this many sweeps.
    pub max_sweeps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-15,
            max_sweeps: 10_000,
        }
    }
}

/// A `pcurve fit` run as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub method: FitMethod,
    pub param: ParamKind,
    /// Fit `y` as a function of `x` instead of `x(t), y(t)`.
    pub graph: bool,
    /// Sampling range for graph mode; a missing bound comes from the data.
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub debug_bundle: bool,
}

/// A `pcurve spline` run as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct SplineConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub param: ParamKind,
    /// Parameter step between samples inside a segment.
    pub step: f64,
    /// Per-knot tangent file; switches evaluation to Hermite mode.
    pub tangents: Option<PathBuf>,
    pub solver: SolverOptions,
    pub debug_bundle: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_kind_discriminants_round_trip() {
        for kind in ParamKind::ALL {
            assert_eq!(ParamKind::from_index(kind.index() as i64), kind);
        }
        assert_eq!(ParamKind::from_index(7), ParamKind::Chord);
        assert_eq!(ParamKind::from_index(-1), ParamKind::Chord);
    }

    #[test]
    fn param_kind_cycles() {
        assert_eq!(ParamKind::Chord.next(), ParamKind::Centripetal);
        assert_eq!(ParamKind::Foley.next(), ParamKind::Chord);
    }

    #[test]
    fn dedup_keeps_order_and_drops_repeats() {
        let pts = vec![
            point(0.0, 0.0),
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(0.0, 0.0),
            point(0.0, 0.0),
        ];
        let out = dedup_consecutive(&pts);
        assert_eq!(out, vec![point(0.0, 0.0), point(1.0, 0.0), point(0.0, 0.0)]);
    }
}
