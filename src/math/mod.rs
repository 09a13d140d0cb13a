//! Mathematical utilities: basis functions, dense solves, and relaxation.

pub mod basis;
pub mod relax;
pub mod solve;

pub use basis::*;
pub use relax::*;
pub use solve::*;
