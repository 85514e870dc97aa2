//! MsgBlock error types

use core::fmt;

use thiserror::Error;

/// Boxed underlying cause carried by a [`ProtocolError`].
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Received data was malformed or not of the expected shape.
///
/// Raised for block-level schema violations: a wrong root tag, an
/// unexpected tag at the top level of the block, or stray character data
/// where only elements are allowed. Per-message defects never surface as
/// a `ProtocolError`; the decoder logs and skips those messages instead.
#[derive(Debug)]
pub struct ProtocolError {
    message: String,
    cause: Option<Cause>,
}

impl ProtocolError {
    /// Create a protocol error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create a protocol error from a message and the failure that triggered it.
    pub fn with_cause(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// Description of the violated rule.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Protocol Error: {}", self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// MsgBlock decoding errors
#[derive(Error, Debug)]
pub enum Error {
    /// Block-level schema violation
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Failure reported by the tag-stream engine: malformed or truncated
    /// markup, bad escapes, text not valid in the declared encoding, or an
    /// I/O failure of the encoder's sink
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Requested window exceeds the supplied buffer
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Block larger than the configured limit
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl Error {
    /// Whether this failure is a protocol violation rather than a stream or I/O failure.
    #[must_use]
    pub const fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
