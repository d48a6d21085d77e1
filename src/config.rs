//! System configuration parameters
//!
//! All tunable parameters for the HiGrow bridge.  Defaults reproduce the
//! reference board; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::app::channels::ChannelId;
use crate::drivers::watchdog::DEFAULT_TIMEOUT_MS;
use crate::error::{Error, Result};
use crate::sensors::filter::{DEFAULT_SAMPLE_DELAY_MS, DEFAULT_WINDOW, MAX_WINDOW, MIN_WINDOW};
use crate::sensors::salinity::SalinityCalibration;
use crate::sensors::scaling::DEFAULT_VREF_MV;

/// A digital output driven by inbound dashboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Channel the dashboard sends commands on.
    pub channel: ChannelId,
    /// Output GPIO.
    pub gpio: i32,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    // --- Salinity filter ---
    /// Samples per salinity window (3..=256)
    pub salinity_window: u16,
    /// Pause after each salinity sample (milliseconds)
    pub salinity_sample_delay_ms: u32,
    /// Mapping from filtered count to reported percentage
    pub salinity_calibration: SalinityCalibration,

    // --- Scaling ---
    /// ADC reference calibration for the battery divider (millivolts)
    pub battery_vref_mv: u16,
    /// Sea-level pressure used for the altitude estimate (hPa)
    pub sea_level_hpa: f32,

    // --- Timing ---
    /// Interval between reports on each channel (seconds)
    pub report_interval_secs: u32,
    /// Main loop tick (milliseconds)
    pub loop_interval_ms: u32,
    /// Button hold time that counts as a long press (milliseconds)
    pub long_press_ms: u32,

    // --- Inbound commands ---
    /// Optional digital actuator echoed back to the dashboard
    pub actuator: Option<ActuatorConfig>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            // Salinity filter
            salinity_window: DEFAULT_WINDOW as u16,
            salinity_sample_delay_ms: DEFAULT_SAMPLE_DELAY_MS,
            salinity_calibration: SalinityCalibration::Identity,

            // Scaling
            battery_vref_mv: DEFAULT_VREF_MV,
            sea_level_hpa: 1013.25,

            // Timing
            report_interval_secs: 15, // dashboard library default cadence
            loop_interval_ms: 100,
            long_press_ms: 1000,

            actuator: None,
        }
    }
}

impl BridgeConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the sampling and scheduling code cannot honour.
    pub fn validate(&self) -> Result<()> {
        let window = usize::from(self.salinity_window);
        if window < MIN_WINDOW {
            return Err(Error::Config("salinity_window must be at least 3"));
        }
        if window > MAX_WINDOW {
            return Err(Error::Config("salinity_window exceeds buffer capacity"));
        }
        if self.battery_vref_mv == 0 {
            return Err(Error::Config("battery_vref_mv must be non-zero"));
        }
        if !(self.sea_level_hpa.is_finite() && self.sea_level_hpa > 0.0) {
            return Err(Error::Config("sea_level_hpa must be positive"));
        }
        if self.loop_interval_ms == 0 {
            return Err(Error::Config("loop_interval_ms must be non-zero"));
        }
        if self.report_interval_secs == 0 {
            return Err(Error::Config("report_interval_secs must be non-zero"));
        }
        if u64::from(self.report_interval_secs) * 1000 < u64::from(self.loop_interval_ms) {
            return Err(Error::Config("report interval shorter than loop tick"));
        }
        // A salinity window blocks the loop; it gets at most half the
        // watchdog budget, the loop sleep the other half.
        let budget_ms = u64::from(DEFAULT_TIMEOUT_MS) / 2;
        if self.salinity_blocking_ms() > budget_ms {
            return Err(Error::Config("salinity window outlasts the watchdog"));
        }
        if u64::from(self.loop_interval_ms) > budget_ms {
            return Err(Error::Config("loop_interval_ms outlasts the watchdog"));
        }
        Ok(())
    }

    /// How long one salinity window holds the loop.
    pub fn salinity_blocking_ms(&self) -> u64 {
        u64::from(self.salinity_window) * u64::from(self.salinity_sample_delay_ms)
    }
}
