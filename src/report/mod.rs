//! Reporting utilities: plain-text summaries of parametrizations, fitted
//! coefficients and spline solves.

pub mod format;

pub use format::*;
