//! Display smoothing
//!
//! Telemetry arrives in bursts; snapping the dashboard to every new value
//! makes it jitter. Two strategies are used:
//! - speed: a fixed-duration tween started only when a frame arrives
//! - tilt: a lag filter stepped on every animation tick, new target or not
//!
//! [`Smoother`] owns both channels and the values currently on screen.

mod filter;
mod tween;

pub use filter::LagFilter;
pub use tween::{SmoothingSession, TweenChannel};

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::SmoothingConfig;

/// Linear interpolation with `t` clamped to `[0, 1]`
///
/// The result never leaves the `[from, to]` span and is exactly `to` at `t = 1`.
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 {
        return to;
    }
    let value = from + (to - from) * t;
    value.clamp(from.min(to), from.max(to))
}

/// An animated dashboard channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Speed readout, km/h
    Speed,
    /// World tilt, degrees
    Tilt,
}

/// Values on screen after a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothedValues {
    /// Displayed speed, km/h
    pub speed_kmh: f64,
    /// Whether the speed tween was in flight during this tick
    pub speed_changed: bool,
    /// Displayed tilt, degrees
    pub tilt_deg: f64,
}

/// Owner of all animated display state
#[derive(Debug, Clone)]
pub struct Smoother {
    speed: TweenChannel,
    tilt: LagFilter,
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(&SmoothingConfig::default())
    }
}

impl Smoother {
    /// Create a smoother from configuration, resting at zero
    pub fn new(config: &SmoothingConfig) -> Self {
        Self::with_timing(
            Duration::from_millis(config.speed_tween_ms),
            Duration::from_millis(config.tilt_response_ms),
        )
    }

    /// Create a smoother with explicit timings
    pub fn with_timing(speed_tween: Duration, tilt_response: Duration) -> Self {
        Self {
            speed: TweenChannel::new(0.0, speed_tween),
            tilt: LagFilter::new(0.0, tilt_response),
        }
    }

    /// Point a channel at a new target, abandoning whatever was in flight
    pub fn retarget(&mut self, channel: Channel, target: f64, now: Instant) {
        match channel {
            Channel::Speed => self.speed.retarget(target, now),
            Channel::Tilt => self.tilt.retarget(target),
        }
    }

    /// Advance every channel to `now`
    pub fn tick(&mut self, now: Instant) -> SmoothedValues {
        let speed_changed = self.speed.is_animating();
        let speed_kmh = self.speed.tick(now);
        let tilt_deg = self.tilt.tick(now);
        SmoothedValues {
            speed_kmh,
            speed_changed,
            tilt_deg,
        }
    }

    /// Speed currently on screen
    pub fn current_speed(&self) -> f64 {
        self.speed.displayed()
    }

    /// Tilt currently on screen
    pub fn current_tilt_deg(&self) -> f64 {
        self.tilt.current()
    }

    /// Where a channel is heading
    pub fn target(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Speed => self.speed.target(),
            Channel::Tilt => self.tilt.target(),
        }
    }

    /// Whether a channel has not yet reached its target
    pub fn is_animating(&self, channel: Channel) -> bool {
        match channel {
            Channel::Speed => self.speed.is_animating(),
            Channel::Tilt => self.tilt.is_settling(),
        }
    }
}
