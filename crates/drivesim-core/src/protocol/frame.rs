//! Frame encoding/decoding
//!
//! Implements the fixed-width frame the device forwards from its SPI link.
//!
//! Frame format (16 bytes):
//! - 0: throttle percent
//! - 1: brake percent
//! - 2: gear (255 = reverse)
//! - 3: speed in device units (fifths of m/s)
//! - 4: reverse flag (non-zero = reversing)
//! - 5: engine speed in hundreds of RPM
//! - 6: drive-mode code
//! - 7: slope in hundredths of a percent, positive = downhill
//! - 8..16: message characters, NUL bytes are padding

use std::fmt::Write as _;

use super::ProtocolError;
use crate::telemetry::{signed_speed, RawVehicleState, FRAME_LEN, MESSAGE_OFFSET};
use crate::units::{device_speed_to_kmh, rpm_from_raw, slope_byte_to_pct};

/// One raw telemetry frame
pub type Frame = [u8; FRAME_LEN];

/// Decoder for fixed-width telemetry frames
pub struct FrameCodec;

impl FrameCodec {
    /// Decode a frame into a raw vehicle state
    ///
    /// Fails with [`ProtocolError::InvalidFrameLength`] unless `bytes` is
    /// exactly [`FRAME_LEN`] long. Decoding a valid frame cannot fail.
    pub fn decode(bytes: &[u8]) -> Result<RawVehicleState, ProtocolError> {
        if bytes.len() != FRAME_LEN {
            return Err(ProtocolError::InvalidFrameLength {
                expected: FRAME_LEN,
                actual: bytes.len(),
            });
        }

        let reverse = bytes[4] != 0;
        let speed = f64::from(device_speed_to_kmh(bytes[3]));

        Ok(RawVehicleState {
            throttle_pct: bytes[0].min(100),
            brake_pct: bytes[1].min(100),
            gear: i64::from(bytes[2]),
            speed_kmh: signed_speed(speed, reverse),
            reverse,
            rpm: rpm_from_raw(bytes[5]),
            drive_mode_code: i64::from(bytes[6]),
            slope_pct: slope_byte_to_pct(bytes[7]),
            message: decode_message(&bytes[MESSAGE_OFFSET..]),
        })
    }
}

/// NUL bytes are skipped, not treated as a terminator
fn decode_message(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect()
}

/// Parse whitespace-separated hex byte tokens (`"14 00 03 ..."`)
///
/// Tokens are case-insensitive and must fit in a byte. The token count is not
/// checked here; that is the frame decoder's job.
pub fn parse_hex_tokens(text: &str) -> Result<Vec<u8>, ProtocolError> {
    text.split_whitespace()
        .map(|token| {
            u8::from_str_radix(token, 16).map_err(|_| ProtocolError::MalformedByteToken {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Format a frame the way the device sends it: upper-case hex, single spaces
pub fn encode_hex(frame: &Frame) -> String {
    let mut out = String::with_capacity(FRAME_LEN * 3);
    for (i, byte) in frame.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

/// Builder for constructing frames
#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    frame: Frame,
}

impl FrameBuilder {
    /// Create a builder with an all-zero frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Throttle percent
    pub fn throttle(mut self, pct: u8) -> Self {
        self.frame[0] = pct;
        self
    }

    /// Brake percent
    pub fn brake(mut self, pct: u8) -> Self {
        self.frame[1] = pct;
        self
    }

    /// Raw gear byte
    pub fn gear(mut self, gear: u8) -> Self {
        self.frame[2] = gear;
        self
    }

    /// Speed in device units
    pub fn speed_raw(mut self, raw: u8) -> Self {
        self.frame[3] = raw;
        self
    }

    /// Reverse flag
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.frame[4] = u8::from(reverse);
        self
    }

    /// Engine speed in hundreds of RPM
    pub fn rpm_raw(mut self, raw: u8) -> Self {
        self.frame[5] = raw;
        self
    }

    /// Drive-mode code
    pub fn drive_mode(mut self, code: u8) -> Self {
        self.frame[6] = code;
        self
    }

    /// Slope byte (hundredths of a percent, positive = downhill)
    pub fn slope_raw(mut self, raw: u8) -> Self {
        self.frame[7] = raw;
        self
    }

    /// Message text; truncated to the payload size, remainder NUL-padded
    pub fn message(mut self, text: &str) -> Self {
        let payload = &mut self.frame[MESSAGE_OFFSET..];
        payload.fill(0);
        for (slot, byte) in payload.iter_mut().zip(text.bytes()) {
            *slot = byte;
        }
        self
    }

    /// Finish the frame
    pub fn build(self) -> Frame {
        self.frame
    }
}
