//! Pipeline coordinator
//!
//! Each inbound message runs one decode → normalize → retarget → render
//! cycle. Between messages the animation tick keeps advancing the smoothed
//! speed and tilt. Both happen on one cooperative loop, so nothing here needs
//! a lock.

use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::clamp::StateClamp;
use crate::config::{DashboardConfig, GaugeConfig};
use crate::dashboard::{DashboardSink, DriveModeDisplay, SpeedReadout, WorldTilt};
use crate::protocol::{self, CommandCodec, FrameCodec, MessageKind, ProtocolError};
use crate::smoothing::{Channel, SmoothedValues, Smoother};
use crate::telemetry::{RawVehicleState, VehicleState};
use crate::transport::{TransportMessage, TransportSource};

/// Counters kept by a running pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Frames (hex text or raw bytes) applied to the dashboard
    pub frames_applied: u64,
    /// Structured commands applied to the dashboard
    pub commands_applied: u64,
    /// Messages dropped because they failed to decode
    pub frames_dropped: u64,
    /// Animation ticks run
    pub ticks: u64,
}

/// Telemetry pipeline driving one dashboard sink
pub struct Pipeline<S: DashboardSink> {
    sink: S,
    smoother: Smoother,
    gauge: GaugeConfig,
    tick_interval: Duration,
    last_state: Option<VehicleState>,
    stats: PipelineStats,
}

impl<S: DashboardSink> Pipeline<S> {
    /// Create a pipeline; display state starts at rest (zero speed, level)
    pub fn new(sink: S, config: &DashboardConfig) -> Self {
        Self {
            sink,
            smoother: Smoother::new(&config.smoothing),
            gauge: config.gauge.clone(),
            tick_interval: config.smoothing.tick_interval(),
            last_state: None,
            stats: PipelineStats::default(),
        }
    }

    /// Decode and apply one transport message
    ///
    /// A message that fails to decode is logged and dropped; nothing on the
    /// dashboard changes.
    pub fn handle(
        &mut self,
        message: TransportMessage,
        now: Instant,
    ) -> Result<&VehicleState, ProtocolError> {
        match Self::decode(message) {
            Ok((kind, raw)) => {
                match kind {
                    MessageKind::Command => self.stats.commands_applied += 1,
                    MessageKind::Frame => self.stats.frames_applied += 1,
                }
                Ok(self.apply(StateClamp::normalize(raw), now))
            }
            Err(e) => {
                self.stats.frames_dropped += 1;
                tracing::warn!(error = %e, dropped = self.stats.frames_dropped, "Dropping telemetry message");
                Err(e)
            }
        }
    }

    fn decode(
        message: TransportMessage,
    ) -> Result<(MessageKind, RawVehicleState), ProtocolError> {
        match message {
            TransportMessage::Text(text) => protocol::decode_text_with_kind(&text),
            TransportMessage::Bytes(bytes) => Ok((MessageKind::Frame, FrameCodec::decode(&bytes)?)),
            TransportMessage::Command(command) => {
                Ok((MessageKind::Command, CommandCodec::decode(&command)))
            }
        }
    }

    /// Apply a normalized state
    ///
    /// Speed and tilt are retargeted on the smoother; everything else goes to
    /// the sink immediately.
    pub fn apply(&mut self, state: VehicleState, now: Instant) -> &VehicleState {
        tracing::debug!(
            speed = state.speed_kmh,
            tilt = state.tilt_deg,
            gear = %state.gear,
            mode = %state.drive_mode,
            "Applying telemetry"
        );

        self.smoother.retarget(Channel::Speed, state.speed_kmh, now);
        self.smoother.retarget(Channel::Tilt, state.tilt_deg, now);

        self.sink.set_throttle(state.throttle_pct);
        self.sink.set_brake(state.brake_pct);
        self.sink.set_gear(state.gear);
        self.sink.set_drive_mode(DriveModeDisplay::from(state.drive_mode));
        self.sink.set_message(&state.message);

        self.last_state.insert(state)
    }

    /// Advance the animation to `now` and push animated values
    ///
    /// The speed readout is only pushed while its tween is running (including
    /// the tick that finishes it); the world tilt is pushed every tick.
    pub fn tick(&mut self, now: Instant) -> SmoothedValues {
        let values = self.smoother.tick(now);
        if values.speed_changed {
            self.sink
                .set_speed(SpeedReadout::new(values.speed_kmh, &self.gauge));
        }
        self.sink
            .set_world_tilt(WorldTilt::from_degrees(values.tilt_deg));
        self.stats.ticks += 1;
        values
    }

    /// Run until the source ends or `cancel` fires
    ///
    /// Transport errors are logged and end the loop. The dashboard keeps
    /// whatever it last showed. One last tick runs before returning so the
    /// final message reaches the sink even if no tick fired after it.
    pub async fn run<T: TransportSource>(
        &mut self,
        mut source: T,
        cancel: CancellationToken,
    ) -> PipelineStats {
        let source_name = source.describe();
        tracing::info!(source = %source_name, "Telemetry pipeline started");

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::info!(source = %source_name, "Telemetry pipeline cancelled");
                    break;
                }
                tick = ticker.tick() => {
                    self.tick(tick.into_std());
                }
                received = source.recv() => match received {
                    Ok(Some(message)) => {
                        let now = tokio::time::Instant::now().into_std();
                        let _ = self.handle(message, now);
                    }
                    Ok(None) => {
                        tracing::info!(source = %source_name, "Telemetry source ended");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(source = %source_name, error = %e, "Telemetry source failed");
                        break;
                    }
                },
            }
        }

        self.tick(tokio::time::Instant::now().into_std());

        tracing::info!(
            frames = self.stats.frames_applied,
            commands = self.stats.commands_applied,
            dropped = self.stats.frames_dropped,
            "Telemetry pipeline stopped"
        );
        self.stats
    }

    /// The sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The sink, mutably
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the pipeline, returning its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// The smoother and its display state
    pub fn smoother(&self) -> &Smoother {
        &self.smoother
    }

    /// The most recently applied state
    pub fn last_state(&self) -> Option<&VehicleState> {
        self.last_state.as_ref()
    }

    /// Counters so far
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }
}
