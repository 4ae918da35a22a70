//! Error types for engine operations

use std::path::PathBuf;

/// Main error type for all engine operations
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// An operation was invoked on state that cannot support it
    ///
    /// Raised when scanning or mutating a grid that was never initialized, where
    /// treating missing geometry as "no tile" would silently under-report matches.
    #[error("Precondition failed in {operation}: {reason}")]
    Precondition {
        /// Name of the operation that was attempted
        operation: &'static str,
        /// Description of the unmet precondition
        reason: String,
    },

    /// Configuration or argument validation failed
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// File system operation failure in a persistence collaborator
    #[error("File system error during {operation} on '{}': {source}", .path.display())]
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Stored high score could not be parsed as a non-negative integer
    #[error("High score file '{}' does not contain an integer: {content:?}", .path.display())]
    CorruptHighScore {
        /// Path of the high score file
        path: PathBuf,
        /// Content that failed to parse
        content: String,
    },
}

/// Convenience type alias for engine results
pub type Result<T> = std::result::Result<T, GameError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GameError {
    GameError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a precondition error
pub fn precondition(operation: &'static str, reason: &impl ToString) -> GameError {
    GameError::Precondition {
        operation,
        reason: reason.to_string(),
    }
}

/// Create a file system error for the given path and operation
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> GameError {
    GameError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
