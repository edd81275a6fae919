//! Built-in dashboard sinks

use std::io::Write;

use super::{DashboardSink, DashboardUpdate, DriveModeDisplay, SpeedReadout, WorldTilt};
use crate::telemetry::Gear;

/// Sink that keeps every update in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    updates: Vec<DashboardUpdate>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates in the order they were made
    pub fn updates(&self) -> &[DashboardUpdate] {
        &self.updates
    }

    /// Drop recorded updates
    pub fn clear(&mut self) {
        self.updates.clear();
    }

    /// Most recent speed readout
    pub fn last_speed(&self) -> Option<SpeedReadout> {
        self.updates.iter().rev().find_map(|u| match u {
            DashboardUpdate::Speed(readout) => Some(*readout),
            _ => None,
        })
    }

    /// Most recent world tilt
    pub fn last_tilt(&self) -> Option<WorldTilt> {
        self.updates.iter().rev().find_map(|u| match u {
            DashboardUpdate::WorldTilt(tilt) => Some(*tilt),
            _ => None,
        })
    }

    /// Most recent gear label
    pub fn last_gear(&self) -> Option<&str> {
        self.updates.iter().rev().find_map(|u| match u {
            DashboardUpdate::Gear { label } => Some(label.as_str()),
            _ => None,
        })
    }

    /// Most recent message
    pub fn last_message(&self) -> Option<&str> {
        self.updates.iter().rev().find_map(|u| match u {
            DashboardUpdate::Message { text } => Some(text.as_str()),
            _ => None,
        })
    }

    fn push(&mut self, update: DashboardUpdate) {
        self.updates.push(update);
    }
}

impl DashboardSink for RecordingSink {
    fn set_throttle(&mut self, pct: u8) {
        self.push(DashboardUpdate::Throttle { pct });
    }

    fn set_brake(&mut self, pct: u8) {
        self.push(DashboardUpdate::Brake { pct });
    }

    fn set_gear(&mut self, gear: Gear) {
        self.push(DashboardUpdate::Gear {
            label: gear.label(),
        });
    }

    fn set_drive_mode(&mut self, mode_display: DriveModeDisplay) {
        self.push(DashboardUpdate::DriveMode(mode_display));
    }

    fn set_message(&mut self, message: &str) {
        self.push(DashboardUpdate::Message {
            text: message.to_string(),
        });
    }

    fn set_speed(&mut self, readout: SpeedReadout) {
        self.push(DashboardUpdate::Speed(readout));
    }

    fn set_world_tilt(&mut self, tilt: WorldTilt) {
        self.push(DashboardUpdate::WorldTilt(tilt));
    }
}

/// Sink that logs every update through `tracing`
///
/// Per-tick updates (speed, tilt) go to `trace`, frame-driven ones to `info`.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl DashboardSink for TracingSink {
    fn set_throttle(&mut self, pct: u8) {
        tracing::info!(throttle = pct, "Throttle: {}%", pct);
    }

    fn set_brake(&mut self, pct: u8) {
        tracing::info!(brake = pct, "Brake: {}%", pct);
    }

    fn set_gear(&mut self, gear: Gear) {
        tracing::info!(gear = %gear, "Gear: {}", gear);
    }

    fn set_drive_mode(&mut self, mode_display: DriveModeDisplay) {
        tracing::info!(
            mode = %mode_display.mode,
            label = mode_display.label,
            "{}",
            mode_display.tooltip
        );
    }

    fn set_message(&mut self, message: &str) {
        tracing::info!("Message: {}", message);
    }

    fn set_speed(&mut self, readout: SpeedReadout) {
        tracing::trace!(
            speed = readout.value,
            gauge_offset = readout.gauge_offset,
            "Speed: {}",
            readout.rounded
        );
    }

    fn set_world_tilt(&mut self, tilt: WorldTilt) {
        tracing::trace!(
            degrees = tilt.degrees,
            camera_rad = tilt.camera_rad,
            "World tilt"
        );
    }
}

/// Sink that writes one JSON object per update
///
/// Write failures are logged and otherwise ignored; the display must not stop
/// because its output did.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, update: DashboardUpdate) {
        let result = serde_json::to_writer(&mut self.writer, &update)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write dashboard update");
        }
    }
}

impl<W: Write> DashboardSink for JsonLinesSink<W> {
    fn set_throttle(&mut self, pct: u8) {
        self.emit(DashboardUpdate::Throttle { pct });
    }

    fn set_brake(&mut self, pct: u8) {
        self.emit(DashboardUpdate::Brake { pct });
    }

    fn set_gear(&mut self, gear: Gear) {
        self.emit(DashboardUpdate::Gear {
            label: gear.label(),
        });
    }

    fn set_drive_mode(&mut self, mode_display: DriveModeDisplay) {
        self.emit(DashboardUpdate::DriveMode(mode_display));
    }

    fn set_message(&mut self, message: &str) {
        self.emit(DashboardUpdate::Message {
            text: message.to_string(),
        });
    }

    fn set_speed(&mut self, readout: SpeedReadout) {
        self.emit(DashboardUpdate::Speed(readout));
    }

    fn set_world_tilt(&mut self, tilt: WorldTilt) {
        self.emit(DashboardUpdate::WorldTilt(tilt));
    }
}
