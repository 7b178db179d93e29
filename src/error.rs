//! Error types for cmdwire.

use thiserror::Error;

/// Main error type for all cmdwire operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on the underlying transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port open or configuration failure.
    #[error("serial port error: {0}")]
    Serial(String),

    /// JSON error while parsing engine options.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An argument field was missing, truncated, or of the wrong type.
    #[error("malformed argument {index}: expected {expected}")]
    MalformedArgument {
        /// Zero-based position of the offending argument.
        index: usize,
        /// Wire form the reader was asked for.
        expected: &'static str,
    },

    /// Attempt to register a handler on a reserved command identifier.
    #[error("command identifier {0} is reserved by the layout")]
    ReservedCommand(u16),

    /// A synchronous exchange was started while another was in flight.
    #[error("synchronous exchange already in flight")]
    ExchangeBusy,

    /// Engine options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

/// Result type alias using the cmdwire [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
