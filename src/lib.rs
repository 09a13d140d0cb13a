//! `plane-curves` library crate.
//!
//! Fits and interpolates planar curves through an ordered point sequence:
//! four parametrizations, four linear fits, and a warm-started cubic spline
//! with optional tangent handles.
//!
//! The binary (`pcurve`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - an interactive editor can drive `session::CurveSession` directly

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod eval;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod param;
pub mod report;
pub mod session;
pub mod spline;
