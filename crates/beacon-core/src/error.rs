//! Error types for the beacon system
//!
//! Every variant maps onto one class of the failure taxonomy. Errors are
//! caught at the boundary of the operation that produced them and turned
//! into a degraded state; none of them ends a loop.

use thiserror::Error;

/// Result type alias for beacon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the beacon system
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or placeholder configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection refused, host unreachable, DNS failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// A bounded call ran out of time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A collaborator answered with a non-success status
    #[error("Protocol error (HTTP {status}): {message}")]
    Protocol {
        /// HTTP status code
        status: u16,
        /// Status reason and any response body
        message: String,
    },

    /// Any other failure from the network layer
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// The external alert mechanism is missing
    #[error("External tool unavailable: {0}")]
    ToolUnavailable(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors (process spawning)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a protocol error from a status code and message
    pub fn protocol(status: u16, message: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            message: message.into(),
        }
    }

    /// Create an unexpected error
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Create a tool-unavailable error
    pub fn tool_unavailable(msg: impl Into<String>) -> Self {
        Self::ToolUnavailable(msg.into())
    }

    /// Whether this error came from a configuration fault
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
