//! Command-line parsing for the planar curve fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting code. Tuning flags also read `PCURVE_*` environment variables
//! (a `.env` file is loaded before parsing).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{MethodKind, ParamKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "pcurve",
    version,
    about = "Planar curve fitting: interpolation, regression and cubic splines"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the parameter vector of a point list.
    Params(ParamsArgs),
    /// Fit a polynomial / Gaussian / least-squares / ridge curve and sample it.
    Fit(FitArgs),
    /// Interpolate a parametric cubic spline and sample it.
    Spline(SplineArgs),
    /// Generate a seeded noisy demo point list.
    Sample(SampleArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ParamsArgs {
    /// Point list (`x<TAB>y` per line).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Parametrization: chord, centripetal, uniform, foley (or 0-3).
    #[arg(short, long, env = "PCURVE_PARAM", default_value = "chord", value_parser = parse_param_kind)]
    pub param: ParamKind,
}

#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Point list (`x<TAB>y` per line).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Fitting method.
    #[arg(short, long, value_enum, default_value_t = MethodKind::Poly)]
    pub method: MethodKind,

    /// Polynomial order for `ls` and `ridge` (clamped to 1..=50).
    #[arg(long, env = "PCURVE_ORDER", default_value_t = 3)]
    pub order: usize,

    /// Ridge penalty (negative values are clamped to 0).
    #[arg(long, env = "PCURVE_LAMBDA", default_value_t = 0.1, allow_negative_numbers = true)]
    pub lambda: f64,

    /// Gaussian width for `gauss`, in abscissa units (t for 2D fits, x for --graph).
    #[arg(long, env = "PCURVE_SIGMA", default_value_t = 0.1)]
    pub sigma: f64,

    /// Parametrization for 2D fits: chord, centripetal, uniform, foley (or 0-3).
    #[arg(short, long, env = "PCURVE_PARAM", default_value = "chord", value_parser = parse_param_kind)]
    pub param: ParamKind,

    /// Fit y as a function of x instead of x(t), y(t).
    #[arg(long)]
    pub graph: bool,

    /// Left end of the sampled x range in --graph mode (default: smallest x).
    #[arg(long, allow_negative_numbers = true)]
    pub x_min: Option<f64>,

    /// Right end of the sampled x range in --graph mode (default: largest x).
    #[arg(long, allow_negative_numbers = true)]
    pub x_max: Option<f64>,

    /// Write the sampled polyline here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a markdown debug bundle under `debug/`.
    #[arg(long)]
    pub debug_bundle: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct SplineArgs {
    /// Point list (`x<TAB>y` per line).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Parametrization: chord, centripetal, uniform, foley (or 0-3).
    #[arg(short, long, env = "PCURVE_PARAM", default_value = "chord", value_parser = parse_param_kind)]
    pub param: ParamKind,

    /// Parameter step between samples inside a segment.
    #[arg(long, default_value_t = 0.001)]
    pub step: f64,

    /// Per-knot tangents (`in_x in_y out_x out_y` per line); selects the Hermite spline.
    #[arg(long)]
    pub tangents: Option<PathBuf>,

    /// Gauss-Seidel sweep budget.
    #[arg(long, env = "PCURVE_MAX_SWEEPS", default_value_t = 10_000)]
    pub max_sweeps: usize,

    /// Gauss-Seidel convergence tolerance (relative to the moment norm, floored at 1).
    #[arg(long, env = "PCURVE_TOLERANCE", default_value_t = 1e-15)]
    pub tolerance: f64,

    /// Write the sampled polyline here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a markdown debug bundle under `debug/`.
    #[arg(long)]
    pub debug_bundle: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Number of points.
    #[arg(short = 'n', long, default_value_t = 12)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the vertical noise.
    #[arg(long, default_value_t = 8.0)]
    pub noise: f64,

    /// Write the points here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Accept a scheme name or its integer discriminant. Unknown integers fall
/// back to chord, unknown names are rejected.
pub fn parse_param_kind(s: &str) -> Result<ParamKind, String> {
    if let Ok(index) = s.trim().parse::<i64>() {
        return Ok(ParamKind::from_index(index));
    }
    ParamKind::from_str(s.trim(), true)
}
