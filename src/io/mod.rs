//! Input/output helpers.
//!
//! - flat `x\ty` point lists, read and written (`points`)
//! - per-knot tangent files for the Hermite spline (`points`)

pub mod points;

pub use points::*;
