use std::io;
use thiserror::Error;

/// Error types for effect data construction, validation and loading
///
/// Evaluation itself never fails: every evaluator degrades to a default or
/// previously valid value. These errors only surface from constructors,
/// validation and (with `serde-support`) JSON loading.
#[derive(Error, Debug)]
pub enum EffectError {
    /// I/O error while reading effect data
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A path needs at least one point
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Effect data violates a structural invariant
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// JSON effect description could not be decoded
    #[cfg(feature = "serde-support")]
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type using EffectError
pub type Result<T> = std::result::Result<T, EffectError>;
