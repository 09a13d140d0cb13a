//! Error types.
//!
//! - `FitError` is what the library returns: every condition is local and
//!   recoverable, the caller adjusts inputs and retries.
//! - `AppError` is what the binary reports: a message plus a process exit code.

use thiserror::Error;

/// Failure of a core numerical operation.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FitError {
    /// The interpolation or normal-equation matrix is not invertible.
    #[error("singular system in {context}: duplicate abscissae or too few points for the requested order")]
    SingularSystem { context: &'static str },

    /// Two consecutive points coincide, so the parameter step is zero.
    #[error("degenerate parametrization: point {index} coincides with its successor")]
    DegenerateParametrization { index: usize },

    /// Gauss-Seidel did not meet its tolerance within the sweep budget.
    #[error("moment solve did not converge after {sweeps} sweeps (last change {change:e})")]
    NonConvergence { sweeps: usize, change: f64 },

    #[error("invalid {parameter}: {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },

    #[error("need at least {required} points, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },

    #[error("length mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("index {index} out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },
}

impl FitError {
    pub fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        FitError::InvalidParameter {
            parameter,
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let exit_code = match err {
            FitError::InvalidParameter { .. }
            | FitError::ShapeMismatch { .. }
            | FitError::IndexOutOfRange { .. } => 2,
            FitError::InsufficientPoints { .. } => 3,
            FitError::SingularSystem { .. }
            | FitError::DegenerateParametrization { .. }
            | FitError::NonConvergence { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
