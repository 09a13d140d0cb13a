//! Linear fits of `y` against a scalar abscissa.
//!
//! Given samples `(x_i, y_i)` every method builds one dense system. The
//! interpolants solve it with [`crate::math::solve_square`]:
//!
//! - polynomial interpolation: `n×n` Vandermonde, `V c = y`
//! - Gaussian-basis interpolation: `(n+1)×(n+1)` kernel system with a bias
//!   column and one extra row pinning the midpoint of the last two samples
//! - least squares: minimize `|V c - y|²` with `V` of shape `n×(order+1)`
//! - ridge regression: minimize `|V c - y|² + λ|c|²`, the solution of
//!   `(VᵀV + λI) c = Vᵀy`
//!
//! The approximations hand `V` itself to [`crate::math::solve_least_squares`];
//! the normal equations are never formed.
//!
//! Nothing is cached: a model is recomputed from scratch whenever points or
//! parameters change.

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitMethod, MAX_ORDER, MIN_ORDER};
use crate::error::FitError;
use crate::math::{solve_least_squares, solve_square};
use crate::models::{Basis, FitModel, fill_design_row};

/// Fewest samples any method accepts.
pub const MIN_POINTS: usize = 2;

/// Fit `ys` against `xs` with the given method.
pub fn fit(method: &FitMethod, xs: &[f64], ys: &[f64]) -> Result<FitModel, FitError> {
    match *method {
        FitMethod::Interpolation => interpolate_polynomial(xs, ys),
        FitMethod::Gauss { sigma } => interpolate_gauss(xs, ys, sigma),
        FitMethod::LeastSquares { order } => approximate_least_squares(xs, ys, order),
        FitMethod::Ridge { order, lambda } => approximate_ridge(xs, ys, order, lambda),
    }
}

/// Polynomial of degree `n - 1` through all `n` samples.
///
/// Requires distinct abscissae.
pub fn interpolate_polynomial(xs: &[f64], ys: &[f64]) -> Result<FitModel, FitError> {
    check_samples(xs, ys)?;
    let n = xs.len();
    let v = design_matrix(&Basis::Power, xs, n);
    let y = DVector::from_column_slice(ys);
    let c = solve_square(&v, &y, "polynomial interpolation")?;
    log::debug!("polynomial interpolation: {n} points");
    Ok(FitModel::new(Basis::Power, c.iter().copied().collect()))
}

/// Bias plus one Gaussian bump per sample.
///
/// Rows `0..n` interpolate the samples. Row `n` additionally asks the model
/// to pass through the average of the last two samples at the midpoint of
/// their abscissae, which closes the `n + 1` unknowns.
pub fn interpolate_gauss(xs: &[f64], ys: &[f64], sigma: f64) -> Result<FitModel, FitError> {
    check_samples(xs, ys)?;
    check_sigma(sigma)?;
    let n = xs.len();
    let basis = Basis::Gauss {
        centers: xs.to_vec(),
        sigma,
    };

    let mut a = DMatrix::<f64>::zeros(n + 1, n + 1);
    let mut b = DVector::<f64>::zeros(n + 1);
    let mut row = vec![0.0; n + 1];
    for i in 0..n {
        fill_design_row(&basis, xs[i], &mut row);
        a.row_mut(i).copy_from_slice(&row);
        b[i] = ys[i];
    }
    let x_mid = (xs[n - 1] + xs[n - 2]) / 2.0;
    fill_design_row(&basis, x_mid, &mut row);
    a.row_mut(n).copy_from_slice(&row);
    b[n] = (ys[n - 1] + ys[n - 2]) / 2.0;

    let c = solve_square(&a, &b, "Gaussian-basis interpolation")?;
    log::debug!("Gaussian-basis interpolation: {n} centers, sigma = {sigma}");
    Ok(FitModel::new(basis, c.iter().copied().collect()))
}

/// Least-squares polynomial of the given order.
pub fn approximate_least_squares(
    xs: &[f64],
    ys: &[f64],
    order: usize,
) -> Result<FitModel, FitError> {
    approximate(xs, ys, order, 0.0, "least squares")
}

/// Ridge-regression polynomial of the given order.
///
/// `lambda = 0` is plain least squares.
pub fn approximate_ridge(
    xs: &[f64],
    ys: &[f64],
    order: usize,
    lambda: f64,
) -> Result<FitModel, FitError> {
    let lambda = clamp_lambda(lambda)?;
    approximate(xs, ys, order, lambda, "ridge regression")
}

/// Clamp a polynomial order into `[MIN_ORDER, MAX_ORDER]`.
pub fn clamp_order(order: usize) -> usize {
    let clamped = order.clamp(MIN_ORDER, MAX_ORDER);
    if clamped != order {
        log::warn!("order {order} outside [{MIN_ORDER}, {MAX_ORDER}], using {clamped}");
    }
    clamped
}

/// Clamp a ridge penalty to `[0, ∞)`. Non-finite values are rejected.
pub fn clamp_lambda(lambda: f64) -> Result<f64, FitError> {
    if !lambda.is_finite() {
        return Err(FitError::invalid("lambda", format!("must be finite, got {lambda}")));
    }
    if lambda < 0.0 {
        log::warn!("lambda {lambda} is negative, using 0");
        return Ok(0.0);
    }
    Ok(lambda)
}

fn check_sigma(sigma: f64) -> Result<(), FitError> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(FitError::invalid("sigma", format!("must be finite and > 0, got {sigma}")))
    }
}

fn approximate(
    xs: &[f64],
    ys: &[f64],
    order: usize,
    lambda: f64,
    context: &'static str,
) -> Result<FitModel, FitError> {
    check_samples(xs, ys)?;
    let order = clamp_order(order);
    let v = design_matrix(&Basis::Power, xs, order + 1);
    let y = DVector::from_column_slice(ys);
    let c = solve_least_squares(&v, &y, lambda, context)?;
    log::debug!("{context}: {} points, order {order}, lambda {lambda}", xs.len());
    Ok(FitModel::new(Basis::Power, c.iter().copied().collect()))
}

fn design_matrix(basis: &Basis, xs: &[f64], cols: usize) -> DMatrix<f64> {
    let mut m = DMatrix::<f64>::zeros(xs.len(), cols);
    let mut row = vec![0.0; cols];
    for (i, &x) in xs.iter().enumerate() {
        fill_design_row(basis, x, &mut row);
        m.row_mut(i).copy_from_slice(&row);
    }
    m
}

fn check_samples(xs: &[f64], ys: &[f64]) -> Result<(), FitError> {
    if xs.len() != ys.len() {
        return Err(FitError::ShapeMismatch {
            expected: xs.len(),
            actual: ys.len(),
        });
    }
    if xs.len() < MIN_POINTS {
        return Err(FitError::InsufficientPoints {
            required: MIN_POINTS,
            actual: xs.len(),
        });
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(FitError::invalid("samples", "coordinates must be finite"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleSpec, generate_sample};
    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolation_reproduces_three_points() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0, 0.0];
        let model = interpolate_polynomial(&xs, &ys).unwrap();
        assert_eq!(model.coefficients().len(), 3);
        for (x, y) in xs.iter().zip(ys) {
            assert_abs_diff_eq!(model.predict(*x), y, epsilon = 1e-10);
        }
        // y = 2x - x²
        assert_abs_diff_eq!(model.coefficients()[0], 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(model.coefficients()[1], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(model.coefficients()[2], -1.0, epsilon = 1e-10);
    }

    #[test]
    fn interpolation_handles_pixel_scale_abscissae() {
        let xs = [120.0, 260.0, 330.0, 470.0, 555.0];
        let ys = [300.0, 260.0, 180.0, 200.0, 310.0];
        let model = interpolate_polynomial(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys) {
            assert_abs_diff_eq!(model.predict(*x), y, epsilon = 1e-4);
        }
    }

    #[test]
    fn duplicate_abscissae_are_singular() {
        let xs = [0.0, 1.0, 1.0];
        let ys = [0.0, 1.0, 2.0];
        assert!(matches!(
            interpolate_polynomial(&xs, &ys),
            Err(FitError::SingularSystem { .. })
        ));
    }

    #[test]
    fn gauss_interpolates_and_pins_midpoint() {
        let xs = [0.0, 0.3, 0.55, 1.0];
        let ys = [1.0, -1.0, 2.0, 0.5];
        let model = interpolate_gauss(&xs, &ys, 0.2).unwrap();
        assert_eq!(model.coefficients().len(), xs.len() + 1);
        for (x, y) in xs.iter().zip(ys) {
            assert_abs_diff_eq!(model.predict(*x), y, epsilon = 1e-8);
        }
        assert_abs_diff_eq!(model.predict(0.775), 1.25, epsilon = 1e-8);
    }

    #[test]
    fn gauss_rejects_bad_sigma() {
        let xs = [0.0, 1.0];
        let ys = [0.0, 1.0];
        for sigma in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                interpolate_gauss(&xs, &ys, sigma),
                Err(FitError::InvalidParameter { parameter: "sigma", .. })
            ));
        }
    }

    #[test]
    fn least_squares_line_through_noisy_points() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.1, 0.9, 2.1, 2.9];
        let model = approximate_least_squares(&xs, &ys, 1).unwrap();
        assert_abs_diff_eq!(model.coefficients()[1], 0.96, epsilon = 1e-10);
        assert_abs_diff_eq!(model.coefficients()[0], 0.06, epsilon = 1e-10);
    }

    #[test]
    fn least_squares_full_order_interpolates() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 2.0, 5.0];
        let ls = approximate_least_squares(&xs, &ys, 3).unwrap();
        let ip = interpolate_polynomial(&xs, &ys).unwrap();
        for (a, b) in ls.coefficients().iter().zip(ip.coefficients()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-8);
        }
    }

    #[test]
    fn ridge_with_zero_lambda_is_least_squares() {
        let xs = [0.0, 0.2, 0.45, 0.7, 1.0];
        let ys = [0.0, 0.5, 0.2, 0.9, 1.0];
        let ls = approximate_least_squares(&xs, &ys, 2).unwrap();
        let ridge = approximate_ridge(&xs, &ys, 2, 0.0).unwrap();
        for (a, b) in ls.coefficients().iter().zip(ridge.coefficients()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn too_few_points_for_order_is_singular() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0, 4.0];
        assert!(matches!(
            approximate_least_squares(&xs, &ys, 5),
            Err(FitError::SingularSystem { .. })
        ));
        // A positive penalty makes the same problem well posed.
        assert!(approximate_ridge(&xs, &ys, 5, 0.5).is_ok());
    }

    fn residual(model: &FitModel, xs: &[f64], ys: &[f64]) -> f64 {
        xs.iter()
            .zip(ys)
            .map(|(x, y)| (model.predict(*x) - y).powi(2))
            .sum()
    }

    fn sample_axes(count: usize) -> (Vec<f64>, Vec<f64>) {
        let spec = SampleSpec {
            count,
            seed: 1,
            noise: 5.0,
        };
        generate_sample(&spec)
            .unwrap()
            .iter()
            .map(|p| (p.x as f64, p.y as f64))
            .unzip()
    }

    #[test]
    fn least_squares_on_pixel_scale_sample() {
        let (xs, ys) = sample_axes(30);
        let mut last = f64::INFINITY;
        for order in 4..=8 {
            let model = approximate_least_squares(&xs, &ys, order).unwrap();
            let r = residual(&model, &xs, &ys);
            assert!(r.is_finite(), "order {order}");
            // Nested models: a higher order never fits worse.
            assert!(r <= last * (1.0 + 1e-6), "order {order}: {r} > {last}");
            last = r;
        }
    }

    #[test]
    fn ridge_on_pixel_scale_sample() {
        let (xs, ys) = sample_axes(30);
        let model = approximate_ridge(&xs, &ys, 5, 0.5).unwrap();
        assert!(residual(&model, &xs, &ys).is_finite());
    }

    #[test]
    fn ridge_accepts_order_above_point_count() {
        let (xs, ys) = sample_axes(5);
        let model = approximate_ridge(&xs, &ys, 8, 0.5).unwrap();
        assert_eq!(model.coefficients().len(), 9);
        assert!(residual(&model, &xs, &ys).is_finite());
    }

    #[test]
    fn high_order_least_squares_on_unit_interval() {
        let xs: Vec<f64> = (0..40).map(|i| i as f64 / 39.0).collect();
        let ys: Vec<f64> = xs.iter().map(|x| (6.0 * x).sin() + 0.3 * x).collect();
        let model = approximate_least_squares(&xs, &ys, 12).unwrap();
        assert!(residual(&model, &xs, &ys) < 1e-6);
    }

    #[test]
    fn order_and_lambda_are_clamped() {
        assert_eq!(clamp_order(0), MIN_ORDER);
        assert_eq!(clamp_order(80), MAX_ORDER);
        assert_eq!(clamp_order(7), 7);
        assert_eq!(clamp_lambda(-2.0).unwrap(), 0.0);
        assert!(clamp_lambda(f64::INFINITY).is_err());
    }

    #[test]
    fn single_point_is_rejected() {
        assert_eq!(
            interpolate_polynomial(&[1.0], &[2.0]),
            Err(FitError::InsufficientPoints { required: 2, actual: 1 })
        );
    }

    #[test]
    fn refitting_is_deterministic() {
        let xs = [0.0, 0.25, 0.5, 0.75, 1.0];
        let ys = [0.0, 1.0, 0.0, -1.0, 0.0];
        let method = FitMethod::Ridge { order: 3, lambda: 0.1 };
        assert_eq!(fit(&method, &xs, &ys).unwrap(), fit(&method, &xs, &ys).unwrap());
    }
}
