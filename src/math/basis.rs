//! Basis functions used by the linear fits.
//!
//! - power basis: `φ_j(x) = x^j`
//! - Gaussian radial basis: `φ(x; c, σ) = exp(-(x - c)² / (2σ²))`
//!
//! Polynomials are evaluated with Horner's scheme, which is the same sum
//! `Σ c_j x^j` with one rounding per coefficient instead of one per power.

/// `x^j`.
pub fn power(x: f64, j: usize) -> f64 {
    x.powi(j as i32)
}

/// Gaussian bump of width `sigma` centered at `center`.
pub fn gauss(x: f64, center: f64, sigma: f64) -> f64 {
    let d = x - center;
    (-(d * d) / (2.0 * sigma * sigma)).exp()
}

/// Evaluate `Σ coefficients[j] · x^j`.
pub fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluate the cubic `a0 + a1 t + a2 t² + a3 t³`.
pub fn cubic(a: &[f64; 4], t: f64) -> f64 {
    horner(a, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horner_matches_power_sum() {
        let c = [1.0, -2.0, 0.5, 3.0];
        for &x in &[-2.0, -0.3, 0.0, 0.7, 4.0] {
            let direct: f64 = c.iter().enumerate().map(|(j, cj)| cj * power(x, j)).sum();
            assert!((horner(&c, x) - direct).abs() < 1e-12);
        }
    }

    #[test]
    fn gauss_peaks_at_center() {
        assert_eq!(gauss(0.3, 0.3, 0.1), 1.0);
        assert!(gauss(0.4, 0.3, 0.1) < 1.0);
        // One sigma away: exp(-1/2).
        assert!((gauss(1.1, 1.0, 0.1) - (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn empty_polynomial_is_zero() {
        assert_eq!(horner(&[], 3.0), 0.0);
    }
}
