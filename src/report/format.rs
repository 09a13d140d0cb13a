//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{FitMethod, ParamKind, SplineMode};
use crate::fit::ParametricFit;
use crate::models::{Basis, FitModel};
use crate::spline::SolveReport;

/// One `index  t` line per knot under a short header.
pub fn format_parameters(kind: ParamKind, t: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== {} parametrization ({} points) ===\n",
        kind.display_name(),
        t.len()
    ));
    for (i, v) in t.iter().enumerate() {
        out.push_str(&format!("{i:>5}  {v:.9}\n"));
    }
    out
}

/// Method name plus its tuning parameters, e.g. `ridge regression (order=5, lambda=0.1)`.
pub fn format_method(method: &FitMethod) -> String {
    let name = method.display_name();
    match method {
        FitMethod::Interpolation => name.to_string(),
        FitMethod::Gauss { sigma } => format!("{name} (sigma={sigma})"),
        FitMethod::LeastSquares { order } => format!("{name} (order={order})"),
        FitMethod::Ridge { order, lambda } => format!("{name} (order={order}, lambda={lambda})"),
    }
}

pub fn format_model(label: &str, model: &FitModel) -> String {
    let mut out = String::new();
    let basis = match model.basis() {
        Basis::Power => "power basis".to_string(),
        Basis::Gauss { centers, sigma } => {
            format!("gaussian basis, {} centers, sigma={sigma}", centers.len())
        }
    };
    out.push_str(&format!(
        "{label}: {basis}, {} coefficients\n",
        model.coefficients().len()
    ));
    out.push_str(&format!("  {}\n", fmt_vec(model.coefficients())));
    out
}

/// Summary of a 2D fit: method, parametrization and both coordinate models.
pub fn format_parametric_fit(method: &FitMethod, fit: &ParametricFit) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", format_method(method)));
    out.push_str(&format!(
        "Parametrization: {} ({} points)\n",
        fit.param_kind().display_name(),
        fit.parameters().len()
    ));
    out.push_str(&format_model("x(t)", fit.x_model()));
    out.push_str(&format_model("y(t)", fit.y_model()));
    out
}

/// Summary of a `y(x)` fit sampled over `[x_min, x_max]`.
pub fn format_graph_fit(method: &FitMethod, model: &FitModel, x_range: (f64, f64)) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", format_method(method)));
    out.push_str(&format!("Graph over x=[{:.3}, {:.3}]\n", x_range.0, x_range.1));
    out.push_str(&format_model("y(x)", model));
    out
}

pub fn format_solve_report(report: &SolveReport, mode: SplineMode, samples: usize) -> String {
    let mode = match mode {
        SplineMode::Natural => "natural",
        SplineMode::Hermite => "hermite",
    };
    format!(
        "=== cubic spline ({mode}) ===\nKnots: {} | sweeps x={} y={} | samples: {samples}\n",
        report.knots, report.sweeps_x, report.sweeps_y
    )
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6e}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::point;
    use crate::fit::{fit_graph, fit_parametric};

    #[test]
    fn parameters_list_every_knot() {
        let s = format_parameters(ParamKind::Uniform, &[0.0, 0.5, 1.0]);
        assert!(s.starts_with("=== uniform parametrization (3 points) ==="));
        assert!(s.contains("    1  0.500000000"));
        assert_eq!(s.lines().count(), 4);
    }

    #[test]
    fn method_line_shows_parameters() {
        assert_eq!(
            format_method(&FitMethod::Ridge { order: 3, lambda: 0.5 }),
            "ridge regression (order=3, lambda=0.5)"
        );
        assert_eq!(format_method(&FitMethod::Interpolation), "polynomial interpolation");
    }

    #[test]
    fn parametric_summary_has_both_axes() {
        let pts = vec![point(0.0, 0.0), point(1.0, 1.0), point(2.0, 0.0)];
        let fit = fit_parametric(&FitMethod::Interpolation, ParamKind::Chord, &pts).unwrap();
        let s = format_parametric_fit(&FitMethod::Interpolation, &fit);
        assert!(s.contains("x(t): power basis, 3 coefficients"));
        assert!(s.contains("y(t): power basis, 3 coefficients"));
    }

    #[test]
    fn graph_summary_names_range() {
        let pts = vec![point(0.0, 0.0), point(1.0, 1.0)];
        let model = fit_graph(&FitMethod::Gauss { sigma: 1.0 }, &pts).unwrap();
        let s = format_graph_fit(&FitMethod::Gauss { sigma: 1.0 }, &model, (0.0, 1.0));
        assert!(s.contains("x=[0.000, 1.000]"));
        assert!(s.contains("gaussian basis, 2 centers"));
    }

    #[test]
    fn solve_report_line() {
        let r = SolveReport {
            knots: 4,
            sweeps_x: 12,
            sweeps_y: 11,
        };
        let s = format_solve_report(&r, SplineMode::Natural, 1001);
        assert!(s.contains("Knots: 4 | sweeps x=12 y=11 | samples: 1001"));
    }
}
