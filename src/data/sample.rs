//! Synthetic point sets for demos and tests.
//!
//! Points follow a smooth wave in pixel-like coordinates,
//!
//! ```text
//! x(u) = 100 + 400·u
//! y(u) = 300 + 120·sin(2πu) + 40·cos(5πu) + ε,   ε ~ N(0, noise²)
//! ```
//!
//! with `u` jittered inside `count` equal strata so `x` is strictly
//! increasing (the graph fits need distinct abscissae). The same seed always
//! yields the same points.

use std::f64::consts::PI;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Point, dedup_consecutive, point};
use crate::error::AppError;

/// Largest sample the generator will produce.
pub const MAX_SAMPLE_COUNT: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSpec {
    pub count: usize,
    pub seed: u64,
    /// Standard deviation of the vertical noise.
    pub noise: f64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            count: 12,
            seed: 42,
            noise: 8.0,
        }
    }
}

pub fn generate_sample(spec: &SampleSpec) -> Result<Vec<Point>, AppError> {
    if spec.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if spec.count > MAX_SAMPLE_COUNT {
        return Err(AppError::new(
            2,
            format!("Sample count must be <= {MAX_SAMPLE_COUNT}."),
        ));
    }
    if !(spec.noise.is_finite() && spec.noise >= 0.0) {
        return Err(AppError::new(2, "Noise must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, spec.noise)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;

    let n = spec.count as f64;
    let points: Vec<Point> = (0..spec.count)
        .map(|i| {
            // Keep a margin inside each stratum so neighbours never collide.
            let u = (i as f64 + rng.gen_range(0.1..0.9)) / n;
            let y = baseline(u) + normal.sample(&mut rng);
            point(100.0 + 400.0 * u, y)
        })
        .collect();

    Ok(dedup_consecutive(&points))
}

/// Noise-free height of the wave at `u ∈ [0, 1]`.
pub fn baseline(u: f64) -> f64 {
    300.0 + 120.0 * (2.0 * PI * u).sin() + 40.0 * (5.0 * PI * u).cos()
}
