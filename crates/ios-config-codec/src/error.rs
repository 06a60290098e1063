//! Error types for running-config parsing and rendering.

use thiserror::Error;

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while parsing or rendering device configuration text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A known statement carried a value that could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the device output.
        line: usize,
        /// Error message.
        message: String,
    },

    /// `diff` was asked to transition between two different entity kinds.
    #[error("Cannot diff {old} against {new}")]
    KindMismatch {
        old: &'static str,
        new: &'static str,
    },
}

impl CodecError {
    /// Creates a parse error for the given line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
