//! GPIO / peripheral pin assignments for the HiGrow board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// I²C bus (combo environmental sensor at 0x77, light sensor at 0x23)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 25;
pub const I2C_SCL_GPIO: i32 = 26;

/// BME280 combo sensor address.
pub const ENV_SENSOR_I2C_ADDR: u8 = 0x77;
/// BH1750 light sensor address.
pub const LIGHT_SENSOR_I2C_ADDR: u8 = 0x23;

// ---------------------------------------------------------------------------
// One-wire / single-bus probes
// ---------------------------------------------------------------------------

/// DHT12 temperature / humidity probe data line.
pub const CLIMATE_PROBE_GPIO: i32 = 16;
/// DS18B20 data line (populated on some board variants only).
pub const DS18B20_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1, 12-bit)
// ---------------------------------------------------------------------------

/// Battery voltage through a 1:2 resistor divider.  ADC1 channel 5.
pub const BATTERY_ADC_GPIO: i32 = 33;
/// Salinity (conductivity) probe.  ADC1 channel 6.
pub const SALINITY_ADC_GPIO: i32 = 34;
/// Capacitive soil-moisture probe.  ADC1 channel 4.
pub const SOIL_ADC_GPIO: i32 = 32;

/// ADC1 channel numbers for the pins above (classic ESP32 mapping).
pub const ADC1_CH_SOIL: u32 = 4;
pub const ADC1_CH_BATTERY: u32 = 5;
pub const ADC1_CH_SALINITY: u32 = 6;

// ---------------------------------------------------------------------------
// Power and user input
// ---------------------------------------------------------------------------

/// Sensor power rail enable.  Must be driven HIGH before any sensor answers.
pub const POWER_CTRL_GPIO: i32 = 4;
/// Settle time after enabling the sensor rail.
pub const POWER_SETTLE_MS: u32 = 200;

/// User button (active-low, external pull-up, input-only pin).
pub const USER_BUTTON_GPIO: i32 = 35;
/// Strapping pin, not used at runtime.
pub const BOOT_GPIO: i32 = 0;
