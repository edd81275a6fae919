//! Fixed-duration tween

use std::time::{Duration, Instant};

use super::lerp;

/// One in-flight interpolation from a previous value to a new target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingSession {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

impl SmoothingSession {
    /// Start a session at `start`
    pub fn new(from: f64, to: f64, start: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Value the session started from
    pub fn from_value(&self) -> f64 {
        self.from
    }

    /// Value the session converges to
    pub fn to_value(&self) -> f64 {
        self.to
    }

    /// Progress in `[0, 1]`; a zero duration is complete immediately
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Interpolated value at `now`
    pub fn value_at(&self, now: Instant) -> f64 {
        lerp(self.from, self.to, self.progress(now))
    }

    /// Whether the session has reached its target at `now`
    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// A channel animated by fixed-duration tweens, one session at a time
#[derive(Debug, Clone)]
pub struct TweenChannel {
    displayed: f64,
    duration: Duration,
    session: Option<SmoothingSession>,
}

impl TweenChannel {
    /// Create a channel resting at `initial`
    pub fn new(initial: f64, duration: Duration) -> Self {
        Self {
            displayed: initial,
            duration,
            session: None,
        }
    }

    /// Replace any in-flight session with one heading for `target`
    ///
    /// The new session starts from whatever is on screen at `now`, so the
    /// readout never jumps; the old destination is abandoned.
    pub fn retarget(&mut self, target: f64, now: Instant) {
        let from = match &self.session {
            Some(session) => session.value_at(now),
            None => self.displayed,
        };
        self.displayed = from;
        self.session = Some(SmoothingSession::new(from, target, now, self.duration));
    }

    /// Advance to `now`, retiring the session once it completes
    pub fn tick(&mut self, now: Instant) -> f64 {
        if let Some(session) = self.session {
            self.displayed = session.value_at(now);
            if session.is_complete(now) {
                self.displayed = session.to_value();
                self.session = None;
            }
        }
        self.displayed
    }

    /// Last displayed value
    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    /// Destination of the in-flight session, or the resting value
    pub fn target(&self) -> f64 {
        self.session.map(|s| s.to_value()).unwrap_or(self.displayed)
    }

    /// The in-flight session, if any
    pub fn session(&self) -> Option<&SmoothingSession> {
        self.session.as_ref()
    }

    /// Whether a session is in flight
    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_session_progress() {
        let t0 = Instant::now();
        let s = SmoothingSession::new(10.0, 50.0, t0, ms(100));
        assert_eq!(s.value_at(t0), 10.0);
        assert!((s.value_at(t0 + ms(50)) - 30.0).abs() < 1e-9);
        assert_eq!(s.value_at(t0 + ms(100)), 50.0);
        assert_eq!(s.value_at(t0 + ms(500)), 50.0);
        assert!(s.is_complete(t0 + ms(100)));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let t0 = Instant::now();
        let s = SmoothingSession::new(0.0, 8.0, t0, Duration::ZERO);
        assert_eq!(s.value_at(t0), 8.0);
    }

    #[test]
    fn test_channel_retires_session() {
        let t0 = Instant::now();
        let mut ch = TweenChannel::new(0.0, ms(100));
        ch.retarget(20.0, t0);
        assert!(ch.is_animating());
        assert!((ch.tick(t0 + ms(25)) - 5.0).abs() < 1e-9);
        assert_eq!(ch.tick(t0 + ms(100)), 20.0);
        assert!(!ch.is_animating());
        assert_eq!(ch.tick(t0 + ms(300)), 20.0);
    }

    #[test]
    fn test_retarget_starts_from_displayed_value() {
        let t0 = Instant::now();
        let mut ch = TweenChannel::new(0.0, ms(100));
        ch.retarget(100.0, t0);
        ch.retarget(0.0, t0 + ms(50));
        let session = ch.session().unwrap();
        assert!((session.from_value() - 50.0).abs() < 1e-9);
        assert_eq!(session.to_value(), 0.0);
    }
}
