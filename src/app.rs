//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - folds flags into `FitConfig` / `SplineConfig`
//! - runs the pipeline
//! - prints summaries and writes the sampled polyline
//!
//! The polyline goes to stdout unless `--output` is given, in which case the
//! summary takes stdout instead. Summaries otherwise go to stderr so stdout
//! stays a clean `x<TAB>y` stream.

use std::path::Path;

use clap::Parser;

use crate::cli::{Command, FitArgs, ParamsArgs, SampleArgs, SplineArgs};
use crate::data::{SampleSpec, generate_sample};
use crate::debug::DebugBundle;
use crate::domain::{FitConfig, FitMethod, MethodKind, Point, SolverOptions, SplineConfig};
use crate::error::AppError;
use crate::fit::{clamp_lambda, clamp_order};
use crate::io::{points_to_string, read_points_file, write_points_file};
use crate::param::parametrize;
use crate::report::{
    format_graph_fit, format_method, format_parameters, format_parametric_fit, format_solve_report,
};

pub mod pipeline;

use pipeline::FittedCurve;

/// Entry point for the `pcurve` binary.
pub fn run() -> Result<(), AppError> {
    // Values from `.env` feed the `PCURVE_*` flag defaults.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Params(args) => handle_params(&args),
        Command::Fit(args) => handle_fit(&args),
        Command::Spline(args) => handle_spline(&args),
        Command::Sample(args) => handle_sample(&args),
    }
}

fn handle_params(args: &ParamsArgs) -> Result<(), AppError> {
    let points = read_points_file(&args.input)?;
    let t = parametrize(args.param, &points)?;
    print!("{}", format_parameters(args.param, &t));
    Ok(())
}

fn handle_fit(args: &FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(args)?;
    let run = pipeline::run_fit(&config)?;

    let summary = match &run.curve {
        FittedCurve::Graph { model, x_range } => format_graph_fit(&config.method, model, *x_range),
        FittedCurve::Parametric(fit) => format_parametric_fit(&config.method, fit),
    };
    emit(&summary, &run.samples, config.output.as_deref())?;

    if config.debug_bundle {
        let path = DebugBundle::new("fit")
            .setting("input", config.input.display())
            .setting("method", format_method(&config.method))
            .setting("parametrization", config.param.display_name())
            .setting("graph", config.graph)
            .points(&run.points)
            .section("Fit", summary)
            .section("Samples", format!("{} points", run.samples.len()))
            .write()?;
        eprintln!("Debug bundle: {}", path.display());
    }
    Ok(())
}

fn handle_spline(args: &SplineArgs) -> Result<(), AppError> {
    let config = spline_config_from_args(args);
    let run = pipeline::run_spline(&config)?;

    let summary = format_solve_report(&run.report, run.mode, run.samples.len());
    emit(&summary, &run.samples, config.output.as_deref())?;

    if config.debug_bundle {
        let tangents: String = run
            .tangents
            .iter()
            .enumerate()
            .map(|(i, p)| {
                format!(
                    "{i:>5}  in=({:.6}, {:.6})  out=({:.6}, {:.6})\n",
                    p.incoming.x, p.incoming.y, p.outgoing.x, p.outgoing.y
                )
            })
            .collect();
        let path = DebugBundle::new("spline")
            .setting("input", config.input.display())
            .setting("parametrization", config.param.display_name())
            .setting("step", config.step)
            .setting("tolerance", config.solver.tolerance)
            .setting("max_sweeps", config.solver.max_sweeps)
            .points(&run.points)
            .section("Parameters", format_parameters(config.param, &run.parameters))
            .section("Solve", summary)
            .section("Tangents", tangents)
            .write()?;
        eprintln!("Debug bundle: {}", path.display());
    }
    Ok(())
}

fn handle_sample(args: &SampleArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        count: args.count,
        seed: args.seed,
        noise: args.noise,
    };
    let points = generate_sample(&spec)?;
    match &args.output {
        Some(path) => write_points_file(path, &points),
        None => {
            print!("{}", points_to_string(&points));
            Ok(())
        }
    }
}

/// Write the polyline to `output` (summary on stdout) or to stdout
/// (summary on stderr).
fn emit(summary: &str, samples: &[Point], output: Option<&Path>) -> Result<(), AppError> {
    match output {
        Some(path) => {
            write_points_file(path, samples)?;
            print!("{summary}");
            println!("Wrote {} samples to {}", samples.len(), path.display());
        }
        None => {
            eprint!("{summary}");
            print!("{}", points_to_string(samples));
        }
    }
    Ok(())
}

/// Fold fit flags into a `FitConfig`, applying the parameter policy
/// (order and lambda clamped, non-finite lambda rejected).
pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    let method = match args.method {
        MethodKind::Poly => FitMethod::Interpolation,
        MethodKind::Gauss => FitMethod::Gauss { sigma: args.sigma },
        MethodKind::Ls => FitMethod::LeastSquares {
            order: clamp_order(args.order),
        },
        MethodKind::Ridge => FitMethod::Ridge {
            order: clamp_order(args.order),
            lambda: clamp_lambda(args.lambda)?,
        },
    };
    Ok(FitConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        method,
        param: args.param,
        graph: args.graph,
        x_min: args.x_min,
        x_max: args.x_max,
        debug_bundle: args.debug_bundle,
    })
}

pub fn spline_config_from_args(args: &SplineArgs) -> SplineConfig {
    SplineConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        param: args.param,
        step: args.step,
        tangents: args.tangents.clone(),
        solver: SolverOptions {
            tolerance: args.tolerance,
            max_sweeps: args.max_sweeps,
        },
        debug_bundle: args.debug_bundle,
    }
}
