//! Fitted model representation and evaluation.
//!
//! Models are plain coefficient vectors tagged with their basis, so fitting
//! and sampling code can stay generic.

pub mod model;

pub use model::*;
