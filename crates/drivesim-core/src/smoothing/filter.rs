//! Frame-rate coupled lag filter

use std::time::{Duration, Instant};

use super::lerp;

/// Decaying-approach filter re-evaluated on every host step
///
/// Each step moves the value a fraction `min(delta / response, 1)` of the
/// remaining distance toward the target. There is no session to finish: a new
/// target just changes where the next steps head.
#[derive(Debug, Clone)]
pub struct LagFilter {
    current: f64,
    target: f64,
    response: Duration,
    last_step: Option<Instant>,
}

impl LagFilter {
    /// Create a filter resting at `initial`
    pub fn new(initial: f64, response: Duration) -> Self {
        Self {
            current: initial,
            target: initial,
            response,
            last_step: None,
        }
    }

    /// Set a new target; the current value is untouched
    pub fn retarget(&mut self, target: f64) {
        self.target = target;
    }

    /// Advance by an explicit step length
    pub fn step(&mut self, delta: Duration) -> f64 {
        let t = if self.response.is_zero() {
            1.0
        } else {
            (delta.as_secs_f64() / self.response.as_secs_f64()).min(1.0)
        };
        self.current = lerp(self.current, self.target, t);
        self.current
    }

    /// Advance to `now`; the first call only records the time
    pub fn tick(&mut self, now: Instant) -> f64 {
        let delta = self
            .last_step
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_step = Some(now);
        self.step(delta)
    }

    /// Current filtered value
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Target the filter is heading for
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the value still differs from the target
    pub fn is_settling(&self) -> bool {
        self.current != self.target
    }
}
