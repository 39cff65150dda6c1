//! Error types for the runtime writer.

use thiserror::Error;

/// Result type alias for encoding sessions.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Error captured by an [`Encoder`](crate::Encoder) during an encoding session.
///
/// Once stored, the error is sticky: every later write on the same encoder is a
/// no-op, and the sink contents must be discarded by the caller.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The underlying sink rejected a write.
    #[error("failed to write to sink: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be marshaled to JSON.
    #[error("failed to marshal value: {0}")]
    Marshal(#[from] serde_json::Error),
}

impl EncodeError {
    /// Check if this error came from the sink rather than from a value.
    pub fn is_io(&self) -> bool {
        matches!(self, EncodeError::Io(_))
    }

    /// Check if this error came from marshaling a value.
    pub fn is_marshal(&self) -> bool {
        matches!(self, EncodeError::Marshal(_))
    }
}
