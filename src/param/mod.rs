//! Curve parametrization.
//!
//! Maps an ordered point sequence to parameter values `0 = t[0] <= ... <= t[n-1] = 1`.

pub mod schemes;

pub use schemes::*;
