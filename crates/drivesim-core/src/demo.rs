//! Demo Mode - Simulated rig producing telemetry frames
//!
//! Generates plausible 16-byte frames for running the dashboard without the
//! rig attached. The simulated vehicle idles, accelerates, cruises, brakes and
//! occasionally backs up, on a gently rolling slope.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::protocol::{Frame, FrameBuilder};
use crate::telemetry::REVERSE_GEAR;

/// Top speed in device units (fifths of m/s); 70 ≈ 50 km/h
const MAX_SPEED_RAW: f64 = 70.0;
/// Reverse speed cap in device units
const MAX_REVERSE_RAW: f64 = 10.0;
/// How often the drive mode flips
const DRIVE_MODE_PERIOD_MS: u64 = 20_000;

/// Simulated device
pub struct DemoDevice {
    /// Time of the first update (ms)
    start_ms: Option<u64>,
    /// Last update time (ms)
    last_ms: u64,
    /// Current driving phase
    phase: Phase,
    /// Speed in device units
    speed_raw: f64,
    /// Pedal position for the current phase
    pedal_pct: u8,
    /// Random number generator
    rng: StdRng,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Stopped
    Idle { until_ms: u64 },
    /// Throttle applied, speed rising
    Accelerate { until_ms: u64 },
    /// Light throttle, speed steady
    Cruise { until_ms: u64 },
    /// Brake applied until stopped
    Brake { reversing: bool },
    /// Backing up, then braking
    Reverse { until_ms: u64 },
}

impl Phase {
    fn label(&self) -> &'static str {
        match self {
            Phase::Idle { .. } => "IDLE",
            Phase::Accelerate { .. } => "ACCEL",
            Phase::Cruise { .. } => "CRUISE",
            Phase::Brake { .. } => "BRAKE",
            Phase::Reverse { .. } => "REVERSE",
        }
    }
}

impl Default for DemoDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoDevice {
    /// Create a device with a random seed
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create a deterministic device
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            start_ms: None,
            last_ms: 0,
            phase: Phase::Idle { until_ms: 1000 },
            speed_raw: 0.0,
            pedal_pct: 0,
            rng,
        }
    }

    /// Advance the simulation and produce the current frame
    ///
    /// # Arguments
    /// * `elapsed_ms` - Milliseconds on any monotonic clock
    pub fn update(&mut self, elapsed_ms: u64) -> Frame {
        let start = *self.start_ms.get_or_insert(elapsed_ms);
        let sim_ms = elapsed_ms.saturating_sub(start);
        let dt = sim_ms.saturating_sub(self.last_ms) as f64 / 1000.0;
        self.last_ms = sim_ms;

        self.update_phase(sim_ms);
        self.update_speed(dt);

        let reversing = matches!(
            self.phase,
            Phase::Reverse { .. } | Phase::Brake { reversing: true }
        );
        let (throttle, brake) = match self.phase {
            Phase::Idle { .. } => (0, 0),
            Phase::Accelerate { .. } | Phase::Reverse { .. } => (self.pedal_pct, 0),
            Phase::Cruise { .. } => (self.pedal_pct, 0),
            Phase::Brake { .. } => (0, self.pedal_pct),
        };

        let speed_kmh = self.speed_raw * 3.6 / 5.0;
        let gear = if reversing {
            REVERSE_GEAR as u8
        } else {
            gear_for_speed(speed_kmh)
        };
        let rpm = 800.0 + speed_kmh * 60.0;

        // Rolling downhill grade, 0..2.55%
        let t = sim_ms as f64 / 1000.0;
        let slope = 127.5 + 127.5 * (t * 0.2).sin();

        let drive_mode = ((sim_ms / DRIVE_MODE_PERIOD_MS) % 2) as u8;

        FrameBuilder::new()
            .throttle(throttle)
            .brake(brake)
            .gear(gear)
            .speed_raw(self.speed_raw.round().clamp(0.0, 255.0) as u8)
            .reverse(reversing)
            .rpm_raw((rpm / 100.0).round().clamp(0.0, 255.0) as u8)
            .drive_mode(drive_mode)
            .slope_raw(slope.round().clamp(0.0, 255.0) as u8)
            .message(self.phase.label())
            .build()
    }

    /// Step the phase state machine
    fn update_phase(&mut self, sim_ms: u64) {
        match self.phase {
            Phase::Idle { until_ms } => {
                if sim_ms >= until_ms {
                    if self.rng.gen_bool(0.2) {
                        self.pedal_pct = self.rng.gen_range(10..30);
                        self.phase = Phase::Reverse {
                            until_ms: sim_ms + self.rng.gen_range(2000..4000),
                        };
                    } else {
                        self.pedal_pct = self.rng.gen_range(40..90);
                        self.phase = Phase::Accelerate {
                            until_ms: sim_ms + self.rng.gen_range(3000..8000),
                        };
                    }
                }
            }
            Phase::Accelerate { until_ms } => {
                if sim_ms >= until_ms || self.speed_raw >= MAX_SPEED_RAW {
                    self.pedal_pct = self.rng.gen_range(10..25);
                    self.phase = Phase::Cruise {
                        until_ms: sim_ms + self.rng.gen_range(4000..12000),
                    };
                }
            }
            Phase::Cruise { until_ms } => {
                if sim_ms >= until_ms {
                    self.pedal_pct = self.rng.gen_range(30..70);
                    self.phase = Phase::Brake { reversing: false };
                }
            }
            Phase::Reverse { until_ms } => {
                if sim_ms >= until_ms {
                    self.pedal_pct = self.rng.gen_range(20..50);
                    self.phase = Phase::Brake { reversing: true };
                }
            }
            Phase::Brake { .. } => {
                if self.speed_raw <= 0.0 {
                    self.pedal_pct = 0;
                    self.phase = Phase::Idle {
                        until_ms: sim_ms + self.rng.gen_range(1000..3000),
                    };
                }
            }
        }
    }

    /// Integrate speed for `dt` seconds
    fn update_speed(&mut self, dt: f64) {
        let pedal = f64::from(self.pedal_pct) / 100.0;
        let accel = match self.phase {
            Phase::Idle { .. } => {
                self.speed_raw = 0.0;
                return;
            }
            Phase::Accelerate { .. } => 12.0 * pedal,
            Phase::Cruise { .. } => 0.0,
            Phase::Brake { .. } => -25.0 * pedal.max(0.3),
            Phase::Reverse { .. } => 4.0 * pedal,
        };
        let cap = match self.phase {
            Phase::Reverse { .. } => MAX_REVERSE_RAW,
            _ => MAX_SPEED_RAW,
        };
        self.speed_raw = (self.speed_raw + accel * dt).clamp(0.0, cap);
    }
}

fn gear_for_speed(speed_kmh: f64) -> u8 {
    match speed_kmh {
        s if s < 15.0 => 1,
        s if s < 30.0 => 2,
        s if s < 45.0 => 3,
        s if s < 60.0 => 4,
        _ => 5,
    }
}
