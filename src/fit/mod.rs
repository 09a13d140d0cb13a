//! Curve fitting.
//!
//! Responsibilities:
//!
//! - solve the four linear fits (interpolation, Gaussian basis, least
//!   squares, ridge) for one coordinate against one abscissa
//! - lift them to planar curves, either as `y(x)` graphs or as `x(t), y(t)`
//!   against a shared parametrization

pub mod linear;
pub mod parametric;

pub use linear::*;
pub use parametric::*;
