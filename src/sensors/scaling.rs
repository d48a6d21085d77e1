//! Fixed linear transforms from raw ADC counts to engineering units.
//!
//! All functions are pure; the ADC read happens in the caller.

/// Full-scale count of the 12-bit ADC.
pub const ADC_MAX: u16 = 4095;

/// Battery divider halves the cell voltage before the ADC.
const BATTERY_DIVIDER: f32 = 2.0;
/// Supply rail the ADC full scale corresponds to.
const SUPPLY_RAIL_V: f32 = 3.3;
/// Default ADC reference calibration (mV).
pub const DEFAULT_VREF_MV: u16 = 1100;

/// Integer affine remap with truncation toward zero.
///
/// Matches the Arduino `map()` helper: the input is not clamped and the
/// output range may be inverted.  A degenerate input range maps to
/// `out_min`.
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let span = in_max - in_min;
    if span == 0 {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / span + out_min
}

/// Soil moisture in percent.  Inverted: a wetter probe reads a lower count.
///
/// `0 → 100`, `4095 → 0`.  Counts above full scale are clamped first.
pub fn soil_moisture_percent(raw: u16) -> u16 {
    let raw = raw.min(ADC_MAX);
    map_range(i32::from(raw), 0, i32::from(ADC_MAX), 100, 0) as u16
}

/// Battery voltage in millivolts, compensating the 1:2 divider and the
/// ADC reference.  Not clamped.
pub fn battery_millivolts(raw: u16, vref_mv: u16) -> f32 {
    (f32::from(raw) / f32::from(ADC_MAX)) * BATTERY_DIVIDER * SUPPLY_RAIL_V * f32::from(vref_mv)
}

/// Barometric altitude (m) from station pressure in Pa and the sea-level
/// reference in hPa.  International barometric formula.
pub fn pressure_altitude_m(pressure_pa: f32, sea_level_hpa: f32) -> f32 {
    let hpa = pressure_pa / 100.0;
    44_330.0 * (1.0 - (hpa / sea_level_hpa).powf(0.1903))
}
