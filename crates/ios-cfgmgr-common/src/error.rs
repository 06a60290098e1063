//! Error types for reconciliation cycles.
//!
//! Absence of an entity is not an error: read and apply return `Option`,
//! with `None` meaning the resource no longer exists on the device.

use std::io;
use thiserror::Error;

use ios_config_codec::CodecError;
use ios_types::ParseError;

/// Result type alias for cfgmgr operations.
pub type CfgMgrResult<T> = Result<T, CfgMgrError>;

/// Errors that can end a reconcile cycle.
#[derive(Debug, Error)]
pub enum CfgMgrError {
    /// The device rejected a command or the session failed.
    #[error("Transport operation failed: {operation}: {message}")]
    Transport {
        /// The operation that failed ("exec" or "configure").
        operation: String,
        /// Error message, including device output when available.
        message: String,
    },

    /// The transport command could not be spawned at all.
    #[error("Failed to execute transport command '{command}': {source}")]
    TransportExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Device text could not be parsed, or a diff could not be rendered.
    #[error("Config codec error: {0}")]
    Codec(#[from] CodecError),

    /// Desired state violates an invariant (e.g. both access and trunk).
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfiguration {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// A CIDR, mask or wildcard string failed to parse.
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] ParseError),

    /// The settings file is unreadable or invalid.
    #[error("Settings error: {message}")]
    Settings {
        /// Error message.
        message: String,
    },

    /// The desired-state document is unreadable or invalid.
    #[error("Document error: {message}")]
    Document {
        /// Error message.
        message: String,
    },
}

impl CfgMgrError {
    /// Creates a transport error.
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a settings error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Creates a document error.
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    /// Returns true if the error came from the device side (session or
    /// device text) rather than from the caller's desired state.
    ///
    /// Device-side failures may leave a batch partially applied; the next
    /// read is the ground truth.
    pub fn is_device_side(&self) -> bool {
        matches!(
            self,
            CfgMgrError::Transport { .. }
                | CfgMgrError::TransportExec { .. }
                | CfgMgrError::Codec(_)
        )
    }
}
