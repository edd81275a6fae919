//! Tests for structured command decoding

#[cfg(test)]
mod tests {
    use drivesim_core::clamp::{StateClamp, MAX_TILT_DEG};
    use drivesim_core::protocol::{decode_text, CommandCodec, ProtocolError};
    use drivesim_core::telemetry::{DriveMode, Gear};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_steep_slope_clamps_tilt() {
        let command = CommandCodec::from_value(json!({
            "speed": 42,
            "reverse": false,
            "throttle": 30,
            "brake": 0,
            "gear": 3,
            "Slope_Percentage": 50,
            "Drive_Mode": 0,
            "Message": "Lap 2"
        }))
        .unwrap();
        let state = StateClamp::normalize(CommandCodec::decode(&command));

        assert_eq!(state.tilt_deg, MAX_TILT_DEG);
        assert_eq!(state.speed_kmh, 42.0);
        assert_eq!(state.throttle_pct, 30);
        assert_eq!(state.gear, Gear::Number(3));
        assert_eq!(state.drive_mode, DriveMode::Normal);
        assert_eq!(state.message, "Lap 2");
        assert_eq!(state.rpm, 0);
    }

    #[test]
    fn test_uphill_clamps_negative() {
        let state = StateClamp::normalize(
            decode_text(r#"{"Slope_Percentage": -300}"#).unwrap(),
        );
        assert_eq!(state.tilt_deg, -MAX_TILT_DEG);
    }

    #[test]
    fn test_reverse_forces_negative_speed() {
        let raw = decode_text(r#"{"speed": 12, "reverse": 1, "gear": 255}"#).unwrap();
        assert_eq!(raw.speed_kmh, -12.0);
        assert!(raw.reverse);
        assert_eq!(StateClamp::normalize(raw).gear, Gear::Reverse);

        // Already negative stays negative
        let raw = decode_text(r#"{"speed": -12, "reverse": true}"#).unwrap();
        assert_eq!(raw.speed_kmh, -12.0);
    }

    #[test]
    fn test_empty_object_takes_defaults() {
        let state = StateClamp::normalize(decode_text("{}").unwrap());
        assert_eq!(state.speed_kmh, 0.0);
        assert_eq!(state.throttle_pct, 0);
        assert_eq!(state.tilt_deg, 0.0);
        assert_eq!(state.drive_mode, DriveMode::Unknown);
        assert_eq!(state.message, "");
    }

    #[test]
    fn test_lenient_drive_mode() {
        let parse = |v: serde_json::Value| {
            CommandCodec::from_value(json!({ "Drive_Mode": v }))
                .unwrap()
                .drive_mode
        };
        assert_eq!(parse(json!(1)), Some(1));
        assert_eq!(parse(json!("0")), Some(0));
        assert_eq!(parse(json!(1.5)), None);
        assert_eq!(parse(json!(null)), None);
    }

    #[test]
    fn test_pedals_clamped() {
        let raw = decode_text(r#"{"throttle": 150, "brake": -4}"#).unwrap();
        assert_eq!(raw.throttle_pct, 100);
        assert_eq!(raw.brake_pct, 0);
    }

    #[test]
    fn test_null_and_float_fields_still_apply() {
        let raw = decode_text(r#"{"speed":10,"throttle":null,"Message":null}"#).unwrap();
        assert_eq!(raw.speed_kmh, 10.0);
        assert_eq!(raw.throttle_pct, 0);
        assert_eq!(raw.message, "");

        let state = StateClamp::normalize(decode_text(r#"{"speed":10,"gear":3.0}"#).unwrap());
        assert_eq!(state.speed_kmh, 10.0);
        assert_eq!(state.gear, Gear::Number(3));
    }

    #[test]
    fn test_malformed_commands() {
        assert!(matches!(
            decode_text("{\"speed\": "),
            Err(ProtocolError::MalformedCommand(_))
        ));
        assert!(matches!(
            CommandCodec::from_value(json!([1, 2, 3])),
            Err(ProtocolError::MalformedCommand(_))
        ));
    }
}
