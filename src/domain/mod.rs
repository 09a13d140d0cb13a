//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the point and tangent types (`Point`, `Tangent`)
//! - selector enums (`ParamKind`, `MethodKind`, `TangentMode`, `HandleSide`, `SplineMode`)
//! - fit and solver configuration (`FitMethod`, `SolverOptions`, `FitConfig`, `SplineConfig`)

pub mod types;

pub use types::*;
