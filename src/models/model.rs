//! Fitted linear models.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given abscissa (for the linear solve)
//! - predict `y(x)` given the coefficients (for sampling and residuals)
//!
//! Both are implemented here for each basis so the fitting code stays generic.

use crate::math::{gauss, horner};

/// Basis a model's coefficients refer to.
#[derive(Debug, Clone, PartialEq)]
pub enum Basis {
    /// `1, x, x², ...`
    Power,
    /// A constant bias followed by one Gaussian per center.
    Gauss { centers: Vec<f64>, sigma: f64 },
}

/// Coefficients produced by one fit. Immutable; refit to change.
#[derive(Debug, Clone, PartialEq)]
pub struct FitModel {
    basis: Basis,
    coefficients: Vec<f64>,
}

impl FitModel {
    pub(crate) fn new(basis: Basis, coefficients: Vec<f64>) -> Self {
        Self {
            basis,
            coefficients,
        }
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Power basis: `c[j]` multiplies `x^j`. Gaussian basis: `c[0]` is the
    /// bias and `c[j]` weighs the bump at `centers[j-1]`.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate the model at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        match &self.basis {
            Basis::Power => horner(&self.coefficients, x),
            Basis::Gauss { centers, sigma } => {
                let (bias, weights) = match self.coefficients.split_first() {
                    Some(split) => split,
                    None => return 0.0,
                };
                bias + weights
                    .iter()
                    .zip(centers)
                    .map(|(w, &c)| w * gauss(x, c, *sigma))
                    .sum::<f64>()
            }
        }
    }
}

/// Fill a design row for `x`.
///
/// For the Gaussian basis the row includes the bias term first.
///
/// # Panics
/// Panics if `out` is longer than the Gaussian basis (centers + 1). Callers
/// size rows from the basis.
pub fn fill_design_row(basis: &Basis, x: f64, out: &mut [f64]) {
    match basis {
        Basis::Power => {
            let mut xj = 1.0;
            for slot in out.iter_mut() {
                *slot = xj;
                xj *= x;
            }
        }
        Basis::Gauss { centers, sigma } => {
            if let Some((bias, rest)) = out.split_first_mut() {
                *bias = 1.0;
                for (j, slot) in rest.iter_mut().enumerate() {
                    *slot = gauss(x, centers[j], *sigma);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_row_counts_up() {
        let mut row = [0.0; 4];
        fill_design_row(&Basis::Power, 2.0, &mut row);
        assert_eq!(row, [1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn gauss_row_starts_with_bias() {
        let basis = Basis::Gauss {
            centers: vec![0.0, 1.0],
            sigma: 1.0,
        };
        let mut row = [0.0; 3];
        fill_design_row(&basis, 0.0, &mut row);
        assert_eq!(row[0], 1.0);
        assert_eq!(row[1], 1.0);
        assert!((row[2] - (-0.5f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn predict_agrees_with_design_row() {
        let basis = Basis::Gauss {
            centers: vec![0.0, 0.5, 1.0],
            sigma: 0.3,
        };
        let model = FitModel::new(basis.clone(), vec![0.5, 1.0, -2.0, 3.0]);
        let mut row = [0.0; 4];
        fill_design_row(&basis, 0.7, &mut row);
        let dot: f64 = row.iter().zip(model.coefficients()).map(|(a, b)| a * b).sum();
        assert!((model.predict(0.7) - dot).abs() < 1e-12);
    }

    #[test]
    fn power_predict_smoke() {
        let model = FitModel::new(Basis::Power, vec![1.0, 0.0, 2.0]);
        assert_eq!(model.predict(3.0), 19.0);
    }
}
