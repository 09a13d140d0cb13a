//! Curve evaluation.
//!
//! Turns fitted models and compiled splines into bounded point sequences
//! for whatever draws or exports them.

pub mod samples;

pub use samples::*;
