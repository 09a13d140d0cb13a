//! Parametric cubic splines.
//!
//! Responsibilities:
//!
//! - keep per-knot moments and tangent pairs in step with the point sequence
//! - solve the natural moment system by warm-started Gauss-Seidel
//! - compile natural or Hermite segments for evaluation
//! - propagate tangent handle edits per knot mode

pub mod handles;
pub mod segment;
pub mod solver;
pub mod state;

pub use handles::*;
pub use segment::*;
pub use solver::*;
pub use state::*;
