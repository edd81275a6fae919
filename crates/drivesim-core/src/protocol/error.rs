//! Protocol errors

use thiserror::Error;

/// Errors that can occur while decoding a telemetry message
///
/// Every variant is per-message: the offending message is dropped and the
/// dashboard keeps its last state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// A frame was not exactly the fixed length
    #[error("Invalid frame length: expected {expected} bytes, got {actual}")]
    InvalidFrameLength {
        /// Required length
        expected: usize,
        /// Length received
        actual: usize,
    },

    /// A hex text token was not a single byte
    #[error("Malformed byte token: '{token}'")]
    MalformedByteToken {
        /// The offending token
        token: String,
    },

    /// A JSON command could not be parsed
    #[error("Malformed command: {0}")]
    MalformedCommand(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        ProtocolError::MalformedCommand(e.to_string())
    }
}
