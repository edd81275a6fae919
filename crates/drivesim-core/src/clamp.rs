//! Normalization of decoded telemetry
//!
//! Turns a [`RawVehicleState`] into the bounded [`VehicleState`] the rest of
//! the dashboard works with:
//! - slope percent → tilt angle, clamped to ±[`MAX_TILT_DEG`]
//! - drive-mode code → [`DriveMode`] (total, never fails)
//! - gear value → [`Gear`] (255 is reverse, everything else literal)

use crate::telemetry::{signed_speed, DriveMode, Gear, RawVehicleState, VehicleState};
use crate::units::slope_pct_to_deg;

/// Largest world tilt the dashboard will show, in degrees
pub const MAX_TILT_DEG: f64 = 12.7;

/// Normalizer for raw telemetry
pub struct StateClamp;

impl StateClamp {
    /// Normalize a raw state
    pub fn normalize(raw: RawVehicleState) -> VehicleState {
        VehicleState {
            throttle_pct: raw.throttle_pct.min(100),
            brake_pct: raw.brake_pct.min(100),
            gear: Gear::from_raw(raw.gear),
            speed_kmh: signed_speed(raw.speed_kmh, raw.reverse),
            reverse: raw.reverse,
            rpm: raw.rpm,
            drive_mode: DriveMode::from_code(raw.drive_mode_code),
            tilt_deg: Self::tilt_from_slope(raw.slope_pct),
            slope_pct: raw.slope_pct,
            message: raw.message,
        }
    }

    /// Slope percent to a clamped tilt angle in degrees
    pub fn tilt_from_slope(slope_pct: f64) -> f64 {
        Self::clamp_tilt(slope_pct_to_deg(slope_pct))
    }

    /// Clamp an angle to ±[`MAX_TILT_DEG`]
    ///
    /// NaN collapses to level rather than propagating into the renderer.
    pub fn clamp_tilt(deg: f64) -> f64 {
        if deg.is_nan() {
            return 0.0;
        }
        deg.clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_slope(slope_pct: f64) -> RawVehicleState {
        RawVehicleState {
            throttle_pct: 0,
            brake_pct: 0,
            gear: 1,
            speed_kmh: 0.0,
            reverse: false,
            rpm: 0,
            drive_mode_code: 0,
            slope_pct,
            message: String::new(),
        }
    }

    #[test]
    fn test_small_slope_passes_through() {
        let state = StateClamp::normalize(raw_with_slope(-2.5));
        assert!((state.tilt_deg + 1.4321).abs() < 0.001);
    }

    #[test]
    fn test_steep_slope_clamped() {
        assert_eq!(StateClamp::tilt_from_slope(50.0), MAX_TILT_DEG);
        assert_eq!(StateClamp::tilt_from_slope(-50.0), -MAX_TILT_DEG);
        assert_eq!(StateClamp::tilt_from_slope(f64::INFINITY), MAX_TILT_DEG);
        assert_eq!(StateClamp::tilt_from_slope(f64::NAN), 0.0);
    }

    #[test]
    fn test_clamp_idempotent() {
        for deg in [-90.0, -12.7, -3.0, 0.0, 5.5, 12.7, 40.0] {
            let once = StateClamp::clamp_tilt(deg);
            assert_eq!(StateClamp::clamp_tilt(once), once);
        }
    }

    #[test]
    fn test_gear_and_mode_mapping() {
        let mut raw = raw_with_slope(0.0);
        raw.gear = 255;
        raw.drive_mode_code = 9;
        let state = StateClamp::normalize(raw);
        assert_eq!(state.gear, Gear::Reverse);
        assert_eq!(state.drive_mode, DriveMode::Unknown);
    }

    #[test]
    fn test_reverse_sign_enforced() {
        let mut raw = raw_with_slope(0.0);
        raw.speed_kmh = 12.0;
        raw.reverse = true;
        assert_eq!(StateClamp::normalize(raw).speed_kmh, -12.0);
    }
}
