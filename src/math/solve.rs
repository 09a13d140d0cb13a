//! Dense linear solves for the fitting code.
//!
//! Two kinds of system show up:
//!
//! ```text
//! interpolation:   V c = y                         (square: Vandermonde / kernel matrix)
//! approximation:   min |V c - y|² + λ|c|²          (tall: n samples, order + 1 columns)
//! ```
//!
//! Implementation choices:
//! - Columns are equilibrated to unit norm before factoring. Power-basis
//!   columns built from pixel coordinates differ by many orders of
//!   magnitude, and the scaling keeps the rank test meaningful.
//! - Square systems use column-pivoted Householder QR. Pivoting pushes small
//!   pivots to the end, so the ratio of the smallest to the largest diagonal
//!   entry of `R` is a cheap rank estimate.
//! - Approximation factors the design matrix itself with an SVD instead of
//!   forming `VᵀV`, which would square its condition number. Ridge stacks
//!   `√λ·I` under `V` and a zero block under `y`; the minimizer is the same as
//!   `(VᵀV + λI) c = Vᵀy`.
//! - A system whose estimate falls under `RANK_RCOND`, or whose solution is
//!   not finite, is reported as `SingularSystem` instead of being returned.
//!   A positive ridge penalty keeps every singular value away from zero, so
//!   only the unpenalized case gets the rank test.

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;

/// Relative pivot size below which a system is treated as rank deficient.
pub const RANK_RCOND: f64 = 1e-13;

/// Solve the square system `a · x = b`.
pub fn solve_square(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    context: &'static str,
) -> Result<DVector<f64>, FitError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(FitError::ShapeMismatch {
            expected: n,
            actual: a.ncols(),
        });
    }
    if b.len() != n {
        return Err(FitError::ShapeMismatch {
            expected: n,
            actual: b.len(),
        });
    }
    if n == 0 {
        return Err(FitError::SingularSystem { context });
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(FitError::SingularSystem { context });
    }

    let scale: Vec<f64> = a.column_iter().map(|c| c.norm()).collect();
    if scale.iter().any(|&s| s == 0.0) {
        return Err(FitError::SingularSystem { context });
    }
    let mut scaled = a.clone();
    for (j, s) in scale.iter().enumerate() {
        scaled.column_mut(j).iter_mut().for_each(|v| *v /= s);
    }

    let qr = scaled.col_piv_qr();
    let r = qr.r();
    let largest = r.diagonal().iter().fold(0.0_f64, |m, d| m.max(d.abs()));
    let smallest = r.diagonal().iter().fold(f64::INFINITY, |m, d| m.min(d.abs()));
    if !(largest.is_finite() && largest > 0.0) || smallest / largest < RANK_RCOND {
        log::debug!("{context}: rank test failed (pivot ratio {:e})", smallest / largest);
        return Err(FitError::SingularSystem { context });
    }

    let z = qr.solve(b).ok_or(FitError::SingularSystem { context })?;
    let x = DVector::from_iterator(n, z.iter().zip(scale.iter()).map(|(zi, s)| zi / s));
    if x.iter().any(|v| !v.is_finite()) {
        return Err(FitError::SingularSystem { context });
    }
    Ok(x)
}

/// Minimize `|design · c - y|² + lambda · |c|²`.
///
/// `lambda = 0` gives ordinary least squares, which needs at least as many
/// rows as columns and a design matrix of full column rank.
pub fn solve_least_squares(
    design: &DMatrix<f64>,
    y: &DVector<f64>,
    lambda: f64,
    context: &'static str,
) -> Result<DVector<f64>, FitError> {
    let (n, p) = design.shape();
    if n != y.len() {
        return Err(FitError::ShapeMismatch {
            expected: n,
            actual: y.len(),
        });
    }
    if !(lambda.is_finite() && lambda >= 0.0) {
        return Err(FitError::invalid("lambda", format!("must be finite and >= 0, got {lambda}")));
    }
    if p == 0 || (lambda == 0.0 && n < p) {
        return Err(FitError::SingularSystem { context });
    }
    if design.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(FitError::SingularSystem { context });
    }

    let (mut a, b) = if lambda > 0.0 {
        let mut a = DMatrix::<f64>::zeros(n + p, p);
        a.view_mut((0, 0), (n, p)).copy_from(design);
        a.view_mut((n, 0), (p, p))
            .copy_from(&(DMatrix::<f64>::identity(p, p) * lambda.sqrt()));
        let mut b = DVector::<f64>::zeros(n + p);
        b.rows_mut(0, n).copy_from(y);
        (a, b)
    } else {
        (design.clone(), y.clone())
    };

    let scale: Vec<f64> = a.column_iter().map(|c| c.norm()).collect();
    if scale.iter().any(|&s| s == 0.0) {
        return Err(FitError::SingularSystem { context });
    }
    for (j, s) in scale.iter().enumerate() {
        a.column_mut(j).iter_mut().for_each(|v| *v /= s);
    }

    let svd = a.svd(true, true);
    let largest = svd.singular_values.max();
    let smallest = svd.singular_values.min();
    if !(largest.is_finite() && largest > 0.0) {
        return Err(FitError::SingularSystem { context });
    }
    if lambda == 0.0 && smallest / largest < RANK_RCOND {
        log::debug!("{context}: rank test failed (singular value ratio {:e})", smallest / largest);
        return Err(FitError::SingularSystem { context });
    }

    let z = svd
        .solve(&b, 0.0)
        .map_err(|_| FitError::SingularSystem { context })?;
    let x = DVector::from_iterator(p, z.iter().zip(scale.iter()).map(|(zi, s)| zi / s));
    if x.iter().any(|v| !v.is_finite()) {
        return Err(FitError::SingularSystem { context });
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_square_system() {
        // 2x + y = 5, x - y = 1  ->  x = 2, y = 1
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, -1.0]);
        let b = DVector::from_row_slice(&[5.0, 1.0]);
        let x = solve_square(&a, &b, "test").unwrap();
        assert!((x[0] - 2.0).abs() < 1e-12);
        assert!((x[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_rows_are_singular() {
        let a = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 4.0, 1.0, 2.0, 4.0, 1.0, 3.0, 9.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let err = solve_square(&a, &b, "test").unwrap_err();
        assert_eq!(err, FitError::SingularSystem { context: "test" });
    }

    #[test]
    fn zero_column_is_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 2.0, 0.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(solve_square(&a, &b, "test").is_err());
    }

    #[test]
    fn least_squares_solves_simple_line() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y, 0.0, "test").unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn ridge_shrinks_coefficients() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let ols = solve_least_squares(&x, &y, 0.0, "test").unwrap();
        let ridge = solve_least_squares(&x, &y, 5.0, "test").unwrap();
        assert!(ridge.norm() < ols.norm());
    }

    #[test]
    fn ridge_matches_penalized_normal_equations() {
        // (XᵀX + 5I) c = Xᵀy  ->  [[8, 3], [3, 10]] c = [15, 21]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);
        let c = solve_least_squares(&x, &y, 5.0, "test").unwrap();
        assert!((c[0] - 87.0 / 71.0).abs() < 1e-12, "{c}");
        assert!((c[1] - 123.0 / 71.0).abs() < 1e-12, "{c}");
    }

    #[test]
    fn more_columns_than_rows_needs_a_penalty() {
        let x = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert_eq!(
            solve_least_squares(&x, &y, 0.0, "test"),
            Err(FitError::SingularSystem { context: "test" })
        );
        let c = solve_least_squares(&x, &y, 0.1, "test").unwrap();
        assert!(c.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn pixel_scale_power_columns_are_not_rank_deficient() {
        // Squaring this design through VᵀV fails the rank test; factoring V
        // directly keeps it well inside.
        let xs: Vec<f64> = (0..30).map(|i| 100.0 + 400.0 * (i as f64 + 0.5) / 30.0).collect();
        let order = 8;
        let v = DMatrix::from_fn(xs.len(), order + 1, |i, j| xs[i].powi(j as i32));
        let y = DVector::from_iterator(xs.len(), xs.iter().map(|x| (x / 80.0).sin() * 100.0));
        let c = solve_least_squares(&v, &y, 0.0, "test").unwrap();
        assert_eq!(c.len(), order + 1);
        assert!(c.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn non_square_is_rejected() {
        let a = DMatrix::<f64>::zeros(2, 3);
        let b = DVector::<f64>::zeros(2);
        assert!(matches!(
            solve_square(&a, &b, "test"),
            Err(FitError::ShapeMismatch { .. })
        ));
    }
}
