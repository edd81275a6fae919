//! Dashboard Module
//!
//! The surface the pipeline drives. Rendering lives behind [`DashboardSink`];
//! this module only computes display-ready values (labels, gauge offset,
//! camera rotation) and provides a few sinks for logging and tests.

mod sinks;

pub use sinks::{JsonLinesSink, RecordingSink, TracingSink};

use serde::{Deserialize, Serialize};

use crate::config::GaugeConfig;
use crate::telemetry::{DriveMode, Gear};
use crate::units::deg_to_rad;

/// Consumer of display updates
pub trait DashboardSink {
    /// Throttle bar, percent
    fn set_throttle(&mut self, pct: u8);

    /// Brake bar, percent
    fn set_brake(&mut self, pct: u8);

    /// Gear indicator
    fn set_gear(&mut self, gear: Gear);

    /// Drive-mode indicator and tooltip
    fn set_drive_mode(&mut self, mode_display: DriveModeDisplay);

    /// Free-text message line
    fn set_message(&mut self, message: &str);

    /// Speed readout and gauge arc
    fn set_speed(&mut self, readout: SpeedReadout);

    /// World rotation for the camera, with counter-rotation for the actor
    fn set_world_tilt(&mut self, tilt: WorldTilt);
}

/// Label and tooltip for the drive-mode indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveModeDisplay {
    /// Drive mode shown
    pub mode: DriveMode,
    /// Indicator text
    pub label: &'static str,
    /// Hover text
    pub tooltip: &'static str,
}

impl From<DriveMode> for DriveModeDisplay {
    fn from(mode: DriveMode) -> Self {
        let (label, tooltip) = match mode {
            DriveMode::Normal => ("Dual Pedal", "Drive Mode: Normal"),
            DriveMode::SinglePedal => ("Single Pedal", "Drive Mode: Single Pedal"),
            DriveMode::Unknown => ("", "Drive Mode: Unknown"),
        };
        Self {
            mode,
            label,
            tooltip,
        }
    }
}

/// Speed readout state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedReadout {
    /// Smoothed speed, km/h
    pub value: f64,
    /// Value shown as digits
    pub rounded: i64,
    /// Dash offset of the gauge arc (stroke length at 0, 0 at full scale)
    pub gauge_offset: f64,
}

impl SpeedReadout {
    /// Build a readout for `value` on the given gauge
    pub fn new(value: f64, gauge: &GaugeConfig) -> Self {
        Self {
            value,
            rounded: value.round() as i64,
            gauge_offset: gauge_offset(value, gauge),
        }
    }
}

/// `stroke - (speed / max) * stroke`
///
/// Not clamped: reverse speeds push the offset past the stroke length, as the
/// gauge has always drawn them.
pub fn gauge_offset(speed: f64, gauge: &GaugeConfig) -> f64 {
    gauge.stroke_length - (speed / gauge.max_speed_kmh) * gauge.stroke_length
}

/// World rotation derived from the smoothed tilt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTilt {
    /// Tilt in degrees
    pub degrees: f64,
    /// Camera rotation, radians
    pub camera_rad: f64,
    /// Rotation applied to the actor so it stays upright on screen
    pub actor_rad: f64,
}

impl WorldTilt {
    /// Build from a tilt angle in degrees
    pub fn from_degrees(degrees: f64) -> Self {
        let camera_rad = deg_to_rad(degrees);
        Self {
            degrees,
            camera_rad,
            actor_rad: -camera_rad,
        }
    }
}

/// Camera zoom that keeps the rotated scene's corners off-screen
///
/// Includes a 2% margin.
pub fn safe_zoom(max_tilt_deg: f64) -> f64 {
    1.0 / (deg_to_rad(max_tilt_deg).cos() * 0.98)
}

/// One call on a [`DashboardSink`], as data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardUpdate {
    /// Throttle percent
    Throttle {
        /// 0..=100
        pct: u8,
    },
    /// Brake percent
    Brake {
        /// 0..=100
        pct: u8,
    },
    /// Gear label
    Gear {
        /// `"R"` or the gear number
        label: String,
    },
    /// Drive mode
    DriveMode(DriveModeDisplay),
    /// Message text
    Message {
        /// Text as shown
        text: String,
    },
    /// Speed readout
    Speed(SpeedReadout),
    /// World tilt
    WorldTilt(WorldTilt),
}
