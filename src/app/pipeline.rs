//! Shared run logic behind the `fit` and `spline` commands.
//!
//! Keeping this in one place keeps the workflow
//! read points -> parametrize -> fit or solve -> sample
//! separate from presentation (printing, exports, debug bundles).

use crate::domain::{FitConfig, Point, SplineConfig, SplineMode, dedup_consecutive};
use crate::error::AppError;
use crate::eval::{sample_graph, sample_parametric, sample_spline};
use crate::fit::{ParametricFit, fit_graph, fit_parametric, x_extent};
use crate::io::{read_points_file, read_tangents_file};
use crate::models::FitModel;
use crate::session::CurveSession;
use crate::spline::{SolveReport, TangentPair};

/// What a fit produced: a `y(x)` model or an `x(t), y(t)` pair.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedCurve {
    Graph { model: FitModel, x_range: (f64, f64) },
    Parametric(ParametricFit),
}

/// All computed outputs of a single `pcurve fit` run.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub points: Vec<Point>,
    pub curve: FittedCurve,
    pub samples: Vec<Point>,
}

/// All computed outputs of a single `pcurve spline` run.
#[derive(Debug, Clone)]
pub struct SplineRun {
    pub points: Vec<Point>,
    pub parameters: Vec<f64>,
    pub mode: SplineMode,
    pub report: SolveReport,
    pub tangents: Vec<TangentPair>,
    pub samples: Vec<Point>,
}

pub fn run_fit(config: &FitConfig) -> Result<FitRun, AppError> {
    let points = read_points_file(&config.input)?;
    run_fit_on_points(config, points)
}

/// Execute the fit on points already in memory.
pub fn run_fit_on_points(config: &FitConfig, points: Vec<Point>) -> Result<FitRun, AppError> {
    let points = prepare_points(points, config.param.uses_positions() && !config.graph)?;

    if config.graph {
        let model = fit_graph(&config.method, &points)?;
        let (lo, hi) = x_extent(&points).ok_or_else(|| AppError::new(3, "No points in input."))?;
        let x_range = (config.x_min.unwrap_or(lo), config.x_max.unwrap_or(hi));
        let samples = sample_graph(&model, x_range.0, x_range.1)?.collect();
        return Ok(FitRun {
            points,
            curve: FittedCurve::Graph { model, x_range },
            samples,
        });
    }

    let fit = fit_parametric(&config.method, config.param, &points)?;
    let samples = sample_parametric(&fit).collect();
    Ok(FitRun {
        points,
        curve: FittedCurve::Parametric(fit),
        samples,
    })
}

pub fn run_spline(config: &SplineConfig) -> Result<SplineRun, AppError> {
    let points = read_points_file(&config.input)?;
    let tangents = match &config.tangents {
        Some(path) => Some(read_tangents_file(path)?),
        None => None,
    };
    run_spline_on_points(config, points, tangents)
}

/// Execute the spline on points (and optional tangents) already in memory.
///
/// Explicit tangents are matched to knots one to one, so consecutive
/// duplicates are only dropped when no tangents are given.
pub fn run_spline_on_points(
    config: &SplineConfig,
    points: Vec<Point>,
    tangents: Option<Vec<TangentPair>>,
) -> Result<SplineRun, AppError> {
    let points = match tangents {
        Some(_) => points,
        None => prepare_points(points, config.param.uses_positions())?,
    };

    let mut session = CurveSession::new(config.param, config.solver).with_step(config.step);
    session.replace_points(points);
    if let Some(pairs) = &tangents {
        session.load_tangents(pairs)?;
    }
    let (report, curve) = session.solve_curve()?;
    let samples = sample_spline(&curve, config.step)?.collect();

    Ok(SplineRun {
        parameters: session.parameters()?,
        points: session.points().to_vec(),
        mode: session.spline_mode(),
        report,
        tangents: session.state().tangents().to_vec(),
        samples,
    })
}

/// Reject empty input and drop in-progress duplicates the parametrization
/// would choke on.
fn prepare_points(points: Vec<Point>, drop_duplicates: bool) -> Result<Vec<Point>, AppError> {
    if points.is_empty() {
        return Err(AppError::new(3, "No points in input."));
    }
    if !drop_duplicates {
        return Ok(points);
    }
    let kept = dedup_consecutive(&points);
    if kept.len() < points.len() {
        log::warn!(
            "dropped {} consecutive duplicate point(s)",
            points.len() - kept.len()
        );
    }
    Ok(kept)
}
