//! Unit Conversion Functions
//!
//! Conversions between the device's wire units and dashboard display units:
//! - Speed: device speed units → km/h
//! - Engine speed: raw byte → RPM
//! - Grade: slope byte → slope percent → degrees
//! - Angles: degrees → radians

/// Convert a raw device speed reading to display km/h
///
/// The device reports speed in fifths of a metre per second. The result is
/// rounded half away from zero to a whole km/h.
pub fn device_speed_to_kmh(raw: u8) -> i32 {
    (f64::from(raw) * 3.6 / 5.0).round() as i32
}

/// Convert the raw RPM byte (hundreds of RPM) to RPM
pub fn rpm_from_raw(raw: u8) -> u32 {
    u32::from(raw) * 100
}

/// Convert the raw slope byte to a signed slope percentage
///
/// Positive bytes mean downhill on the device, shown as a negative slope.
pub fn slope_byte_to_pct(raw: u8) -> f64 {
    -(f64::from(raw) / 100.0)
}

/// Convert a slope percentage (rise over run × 100) to an angle in degrees
pub fn slope_pct_to_deg(pct: f64) -> f64 {
    (pct / 100.0).atan().to_degrees()
}

/// Convert degrees to radians
pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}
