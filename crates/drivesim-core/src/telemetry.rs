//! Vehicle telemetry model
//!
//! [`RawVehicleState`] is what the codecs produce: units converted, but slope
//! still a percentage and drive mode still a device code. [`VehicleState`] is
//! the normalized record produced by [`crate::clamp::StateClamp`] and is the
//! only type the smoother and dashboard see.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bytes in one telemetry frame
pub const FRAME_LEN: usize = 16;

/// Offset of the message payload within a frame
pub const MESSAGE_OFFSET: usize = 8;

/// Gear byte reserved for reverse
pub const REVERSE_GEAR: i64 = 255;

/// Device operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveMode {
    /// Two-pedal driving (code 0)
    Normal,
    /// One-pedal driving (code 1)
    SinglePedal,
    /// Any other code
    Unknown,
}

impl DriveMode {
    /// Map a device drive-mode code. Total: unmapped codes are `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => DriveMode::Normal,
            1 => DriveMode::SinglePedal,
            _ => DriveMode::Unknown,
        }
    }
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveMode::Normal => write!(f, "Normal"),
            DriveMode::SinglePedal => write!(f, "SinglePedal"),
            DriveMode::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Gear as shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Gear {
    /// The reverse sentinel, shown as `R`
    Reverse,
    /// Any other value, shown literally
    Number(i64),
}

impl Gear {
    /// Map a raw gear value. Only [`REVERSE_GEAR`] is special.
    pub fn from_raw(raw: i64) -> Self {
        if raw == REVERSE_GEAR {
            Gear::Reverse
        } else {
            Gear::Number(raw)
        }
    }

    /// Display label (`"R"` or the literal number)
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gear::Reverse => write!(f, "R"),
            Gear::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Decoded but not yet normalized telemetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVehicleState {
    /// Throttle position, 0-100
    pub throttle_pct: u8,
    /// Brake position, 0-100
    pub brake_pct: u8,
    /// Raw gear value (255 = reverse)
    pub gear: i64,
    /// Signed speed in km/h, negative when reversing
    pub speed_kmh: f64,
    /// Reverse flag as reported by the device
    pub reverse: bool,
    /// Engine speed
    pub rpm: u32,
    /// Raw drive-mode code
    pub drive_mode_code: i64,
    /// Signed slope in percent (negative = downhill)
    pub slope_pct: f64,
    /// Free-text message
    pub message: String,
}

/// Normalized telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Throttle position, 0-100
    pub throttle_pct: u8,
    /// Brake position, 0-100
    pub brake_pct: u8,
    /// Display gear
    pub gear: Gear,
    /// Signed speed in km/h; sign always matches `reverse`
    pub speed_kmh: f64,
    /// Reverse flag
    pub reverse: bool,
    /// Engine speed
    pub rpm: u32,
    /// Drive mode
    pub drive_mode: DriveMode,
    /// Slope percentage the tilt was derived from
    pub slope_pct: f64,
    /// World tilt in degrees, within `[-MAX_TILT_DEG, MAX_TILT_DEG]`
    pub tilt_deg: f64,
    /// Free-text message
    pub message: String,
}

/// Apply the reverse flag to a speed magnitude
///
/// The flag decides the sign bit, whatever sign the input carried. At rest in
/// reverse this gives `-0.0`, which compares equal to zero, so "negative iff
/// reverse" holds for [`f64::is_sign_negative`] rather than `< 0.0`.
pub fn signed_speed(speed: f64, reverse: bool) -> f64 {
    if reverse {
        -speed.abs()
    } else {
        speed.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_mode_is_total() {
        assert_eq!(DriveMode::from_code(0), DriveMode::Normal);
        assert_eq!(DriveMode::from_code(1), DriveMode::SinglePedal);
        for code in [-1, 2, 3, 255, i64::MAX, i64::MIN] {
            assert_eq!(DriveMode::from_code(code), DriveMode::Unknown);
        }
    }

    #[test]
    fn test_gear_labels() {
        assert_eq!(Gear::from_raw(255).label(), "R");
        assert_eq!(Gear::from_raw(3).label(), "3");
        assert_eq!(Gear::from_raw(0).label(), "0");
        assert_eq!(Gear::from_raw(-2).label(), "-2");
        assert_eq!(Gear::from_raw(256), Gear::Number(256));
    }

    #[test]
    fn test_signed_speed() {
        assert_eq!(signed_speed(7.0, false), 7.0);
        assert_eq!(signed_speed(7.0, true), -7.0);
        assert_eq!(signed_speed(-7.0, false), 7.0);
        assert_eq!(signed_speed(-7.0, true), -7.0);
    }

    #[test]
    fn test_signed_speed_at_rest() {
        let reversing = signed_speed(0.0, true);
        assert_eq!(reversing, 0.0);
        assert!(reversing.is_sign_negative());
        assert!(signed_speed(-0.0, false).is_sign_positive());
    }
}
