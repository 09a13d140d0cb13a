//! Curve editing session.
//!
//! Holds the state an interactive editor mutates between frames, so the
//! numerical code never reaches for globals.

pub mod editor;

pub use editor::*;
