//! Property tests for decoding, normalization and smoothing

use drivesim_core::clamp::{StateClamp, MAX_TILT_DEG};
use drivesim_core::protocol::{decode_text, encode_hex, FrameCodec, ProtocolError};
use drivesim_core::smoothing::{lerp, Channel, Smoother};
use drivesim_core::telemetry::{DriveMode, Gear};
use proptest::prelude::*;
use std::time::{Duration, Instant};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_any_sixteen_bytes_decode(frame in proptest::array::uniform16(any::<u8>())) {
        let first = FrameCodec::decode(&frame);
        prop_assert!(first.is_ok());
        // Same bytes, same result
        prop_assert_eq!(first, FrameCodec::decode(&frame));
    }

    #[test]
    fn prop_hex_text_agrees_with_bytes(frame in proptest::array::uniform16(any::<u8>())) {
        prop_assert_eq!(decode_text(&encode_hex(&frame)), FrameCodec::decode(&frame));
    }

    #[test]
    fn prop_wrong_length_rejected(
        bytes in proptest::collection::vec(any::<u8>(), 0..48)
            .prop_filter("not a frame length", |b| b.len() != 16)
    ) {
        let rejected = matches!(
            FrameCodec::decode(&bytes),
            Err(ProtocolError::InvalidFrameLength { expected: 16, actual }) if actual == bytes.len()
        );
        prop_assert!(rejected);
    }

    #[test]
    fn prop_normalized_frame_invariants(frame in proptest::array::uniform16(any::<u8>())) {
        let state = StateClamp::normalize(FrameCodec::decode(&frame).unwrap());
        prop_assert!(state.tilt_deg.abs() <= MAX_TILT_DEG);
        prop_assert!(state.throttle_pct <= 100);
        prop_assert!(state.brake_pct <= 100);
        prop_assert_eq!(state.gear == Gear::Reverse, frame[2] == 255);
        if state.reverse {
            prop_assert!(state.speed_kmh <= 0.0);
        } else {
            prop_assert!(state.speed_kmh >= 0.0);
        }
    }

    #[test]
    fn prop_tilt_clamp_bounded_and_idempotent(slope in -1.0e6f64..1.0e6) {
        let tilt = StateClamp::tilt_from_slope(slope);
        prop_assert!(tilt.abs() <= MAX_TILT_DEG);
        prop_assert_eq!(StateClamp::clamp_tilt(tilt), tilt);
    }

    #[test]
    fn prop_drive_mode_total(code in any::<i64>()) {
        let mode = DriveMode::from_code(code);
        match code {
            0 => prop_assert_eq!(mode, DriveMode::Normal),
            1 => prop_assert_eq!(mode, DriveMode::SinglePedal),
            _ => prop_assert_eq!(mode, DriveMode::Unknown),
        }
    }

    #[test]
    fn prop_lerp_stays_in_span(from in -500.0f64..500.0, to in -500.0f64..500.0, t in -1.0f64..2.0) {
        let v = lerp(from, to, t);
        prop_assert!(v >= from.min(to) && v <= from.max(to));
    }

    #[test]
    fn prop_speed_tween_monotonic(
        start in -100.0f64..200.0,
        target in -100.0f64..200.0,
        steps in proptest::collection::vec(1u64..40, 1..20),
    ) {
        let mut smoother = Smoother::default();
        let t0 = Instant::now();
        smoother.retarget(Channel::Speed, start, t0);
        smoother.tick(t0 + Duration::from_millis(100));

        let t1 = t0 + Duration::from_millis(200);
        smoother.retarget(Channel::Speed, target, t1);
        let mut last = smoother.current_speed();
        let mut offset = 0;
        for step in steps {
            offset += step;
            let v = smoother.tick(t1 + Duration::from_millis(offset)).speed_kmh;
            if target >= start {
                prop_assert!(v >= last && v <= target);
            } else {
                prop_assert!(v <= last && v >= target);
            }
            last = v;
        }
        if offset >= 100 {
            prop_assert_eq!(last, target);
        }
    }
}
