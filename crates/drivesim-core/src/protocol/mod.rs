//! Telemetry Wire Protocol
//!
//! Decodes the two ingestion formats the device side can produce:
//! - fixed 16-byte frames, usually carried as space-separated hex text
//! - structured JSON command objects with named fields
//!
//! Both converge on [`crate::telemetry::RawVehicleState`].

mod command;
mod error;
mod frame;

pub use command::{CommandCodec, TelemetryCommand};
pub use error::ProtocolError;
pub use frame::{encode_hex, parse_hex_tokens, Frame, FrameBuilder, FrameCodec};

use crate::telemetry::RawVehicleState;

/// Maximum accepted length of one text message in bytes
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Which ingestion format a message used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A 16-byte frame, as bytes or hex text
    Frame,
    /// A structured JSON command
    Command,
}

impl MessageKind {
    /// Classify a text message by its first non-whitespace character
    pub fn of_text(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            MessageKind::Command
        } else {
            MessageKind::Frame
        }
    }
}

/// Decode one text message from the device
///
/// A message whose first non-whitespace character is `{` is a JSON command;
/// anything else is treated as hex byte tokens.
pub fn decode_text(text: &str) -> Result<RawVehicleState, ProtocolError> {
    decode_text_with_kind(text).map(|(_, raw)| raw)
}

/// Decode one text message, also reporting which format it used
pub fn decode_text_with_kind(
    text: &str,
) -> Result<(MessageKind, RawVehicleState), ProtocolError> {
    let kind = MessageKind::of_text(text);
    let raw = match kind {
        MessageKind::Command => CommandCodec::decode(&CommandCodec::parse(text)?),
        MessageKind::Frame => FrameCodec::decode(&parse_hex_tokens(text)?)?,
    };
    Ok((kind, raw))
}
