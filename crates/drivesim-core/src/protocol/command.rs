//! Structured command decoding
//!
//! Some transports deliver already-parsed objects instead of raw frames:
//!
//! ```json
//! { "speed": 42, "reverse": false, "throttle": 30, "brake": 0, "gear": 3,
//!   "Slope_Percentage": -4.5, "Drive_Mode": 1, "Message": "Lap 2" }
//! ```
//!
//! Every key is optional. Missing keys, `null`s and values of the wrong type
//! take neutral defaults, so one bad field never costs the rest of the
//! command. Numbers may arrive as numeric strings. A missing or non-integral
//! `Drive_Mode` maps to the unknown mode.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ProtocolError;
use crate::telemetry::{signed_speed, RawVehicleState, REVERSE_GEAR};

/// A structured telemetry command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryCommand {
    /// Speed magnitude in km/h
    #[serde(deserialize_with = "lenient_number")]
    pub speed: f64,
    /// Reverse flag; any truthy JSON value counts
    #[serde(deserialize_with = "truthy")]
    pub reverse: bool,
    /// Throttle percent
    #[serde(deserialize_with = "lenient_number")]
    pub throttle: f64,
    /// Brake percent
    #[serde(deserialize_with = "lenient_number")]
    pub brake: f64,
    /// Gear (255 = reverse); `"R"` is accepted for reverse
    #[serde(deserialize_with = "lenient_gear")]
    pub gear: i64,
    /// Signed slope percentage
    #[serde(rename = "Slope_Percentage", deserialize_with = "lenient_number")]
    pub slope_percentage: f64,
    /// Drive-mode code, `None` when absent or not an integer
    #[serde(rename = "Drive_Mode", deserialize_with = "lenient_code")]
    pub drive_mode: Option<i64>,
    /// Free-text message
    #[serde(rename = "Message", deserialize_with = "nullable_string")]
    pub message: String,
}

/// Decoder for structured telemetry commands
pub struct CommandCodec;

impl CommandCodec {
    /// Parse a JSON command object from text
    pub fn parse(text: &str) -> Result<TelemetryCommand, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a command from an already-deserialized JSON value
    pub fn from_value(value: Value) -> Result<TelemetryCommand, ProtocolError> {
        if !value.is_object() {
            return Err(ProtocolError::MalformedCommand(
                "command must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Convert a command into a raw vehicle state
    ///
    /// Applies the same reverse-sign rule as the frame decoder. There is no
    /// engine speed in the command format, so `rpm` is zero.
    pub fn decode(command: &TelemetryCommand) -> RawVehicleState {
        RawVehicleState {
            throttle_pct: percent(command.throttle),
            brake_pct: percent(command.brake),
            gear: command.gear,
            speed_kmh: signed_speed(command.speed, command.reverse),
            reverse: command.reverse,
            rpm: 0,
            // -1 is never a valid code, so it lands on Unknown
            drive_mode_code: command.drive_mode.unwrap_or(-1),
            slope_pct: command.slope_percentage,
            message: command.message.clone(),
        }
    }
}

fn percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Finite number carried by a JSON value, if any
fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0).then_some(f as i64)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_of(&value).unwrap_or_default())
}

fn lenient_gear<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Value::String(s) = &value {
        if s.trim().eq_ignore_ascii_case("R") {
            return Ok(REVERSE_GEAR);
        }
    }
    Ok(number_of(&value).and_then(integral).unwrap_or_default())
}

fn lenient_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        other => number_of(&other),
    };
    Ok(number.and_then(integral))
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_full_command() {
        let cmd = CommandCodec::parse(
            r#"{"speed": 42, "reverse": false, "throttle": 30, "brake": 5, "gear": 3,
                "Slope_Percentage": -4.5, "Drive_Mode": 1, "Message": "Lap 2"}"#,
        )
        .unwrap();
        let raw = CommandCodec::decode(&cmd);
        assert_eq!(
            raw,
            RawVehicleState {
                throttle_pct: 30,
                brake_pct: 5,
                gear: 3,
                speed_kmh: 42.0,
                reverse: false,
                rpm: 0,
                drive_mode_code: 1,
                slope_pct: -4.5,
                message: "Lap 2".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_keys_default() {
        let cmd = CommandCodec::parse("{}").unwrap();
        assert_eq!(cmd, TelemetryCommand::default());
        let raw = CommandCodec::decode(&cmd);
        assert_eq!(raw.speed_kmh, 0.0);
        assert_eq!(raw.drive_mode_code, -1);
        assert!(raw.message.is_empty());
    }

    #[test]
    fn test_truthy_reverse() {
        for (value, expected) in [
            (json!(true), true),
            (json!(1), true),
            (json!("yes"), true),
            (json!(false), false),
            (json!(0), false),
            (json!(""), false),
            (json!(null), false),
        ] {
            let cmd = CommandCodec::from_value(json!({ "speed": 10, "reverse": value })).unwrap();
            assert_eq!(cmd.reverse, expected);
            let raw = CommandCodec::decode(&cmd);
            assert_eq!(raw.speed_kmh < 0.0, expected);
        }
    }

    #[test]
    fn test_drive_mode_leniency() {
        let parse = |v: Value| {
            CommandCodec::from_value(json!({ "Drive_Mode": v }))
                .unwrap()
                .drive_mode
        };
        assert_eq!(parse(json!(0)), Some(0));
        assert_eq!(parse(json!("1")), Some(1));
        assert_eq!(parse(json!(1.0)), Some(1));
        assert_eq!(parse(json!(1.5)), None);
        assert_eq!(parse(json!("sport")), None);
        assert_eq!(parse(json!(7)), Some(7));
    }

    #[test]
    fn test_percent_clamped() {
        let cmd = CommandCodec::from_value(json!({ "throttle": 140, "brake": -3 })).unwrap();
        let raw = CommandCodec::decode(&cmd);
        assert_eq!(raw.throttle_pct, 100);
        assert_eq!(raw.brake_pct, 0);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            CommandCodec::from_value(json!([1, 2, 3])),
            Err(ProtocolError::MalformedCommand(_))
        ));
        assert!(matches!(
            CommandCodec::parse("{\"speed\": "),
            Err(ProtocolError::MalformedCommand(_))
        ));
    }

    #[test]
    fn test_null_message() {
        let cmd = CommandCodec::from_value(json!({ "Message": null })).unwrap();
        assert_eq!(cmd.message, "");
    }

    #[test]
    fn test_null_fields_keep_the_rest() {
        let cmd = CommandCodec::parse(
            r#"{"speed": 10, "throttle": null, "brake": null,
                "Slope_Percentage": null, "Message": null}"#,
        )
        .unwrap();
        let raw = CommandCodec::decode(&cmd);
        assert_eq!(raw.speed_kmh, 10.0);
        assert_eq!(raw.throttle_pct, 0);
        assert_eq!(raw.brake_pct, 0);
        assert_eq!(raw.slope_pct, 0.0);
        assert_eq!(raw.message, "");

        let cmd = CommandCodec::from_value(json!({ "speed": null, "gear": 2 })).unwrap();
        assert_eq!(cmd.speed, 0.0);
        assert_eq!(cmd.gear, 2);
    }

    #[test]
    fn test_float_and_string_numbers() {
        let cmd = CommandCodec::from_value(json!({
            "speed": "12.5",
            "throttle": 30.4,
            "gear": 3.0,
            "Slope_Percentage": "-4",
            "Message": 7
        }))
        .unwrap();
        assert_eq!(cmd.speed, 12.5);
        assert_eq!(cmd.gear, 3);
        assert_eq!(cmd.slope_percentage, -4.0);
        assert_eq!(cmd.message, "7");
        assert_eq!(CommandCodec::decode(&cmd).throttle_pct, 30);
    }

    #[test]
    fn test_gear_leniency() {
        let gear = |v: Value| CommandCodec::from_value(json!({ "gear": v })).unwrap().gear;
        assert_eq!(gear(json!(3.0)), 3);
        assert_eq!(gear(json!("4")), 4);
        assert_eq!(gear(json!("R")), REVERSE_GEAR);
        assert_eq!(gear(json!(255)), REVERSE_GEAR);
        assert_eq!(gear(json!(2.5)), 0);
        assert_eq!(gear(json!(null)), 0);
        assert_eq!(gear(json!("sport")), 0);
    }
}
