//! Salinity (conductivity) probe.
//!
//! The probe output is noisy, so every reading is a trimmed mean over a
//! full sample window (see [`filter`](super::filter)).  The filtered count
//! is then passed through a [`SalinityCalibration`], which is the identity
//! on the reference board batch.

use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};

use crate::app::ports::{AnalogPin, AnalogPort};
use crate::error::SensorError;

use super::filter::FilteredAnalogReader;

/// Mapping from a filtered salinity count to the reported percentage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SalinityCalibration {
    /// Report the filtered count unchanged.
    #[default]
    Identity,
    /// `value = filtered * scale + offset`.
    Linear { scale: f32, offset: f32 },
}

impl SalinityCalibration {
    pub fn apply(&self, filtered: u32) -> f32 {
        match *self {
            Self::Identity => filtered as f32,
            Self::Linear { scale, offset } => filtered as f32 * scale + offset,
        }
    }
}

/// Filtered salinity reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalinitySensor {
    reader: FilteredAnalogReader,
    calibration: SalinityCalibration,
}

impl SalinitySensor {
    pub fn new(reader: FilteredAnalogReader, calibration: SalinityCalibration) -> Self {
        Self {
            reader,
            calibration,
        }
    }

    /// Unscaled trimmed mean.  Blocks for one full window.
    pub fn read_filtered(
        &self,
        adc: &mut impl AnalogPort,
        delay: &mut impl DelayNs,
    ) -> Result<u32, SensorError> {
        self.reader.read(adc, AnalogPin::Salinity, delay)
    }

    /// Calibrated salinity percentage.
    pub fn read(
        &self,
        adc: &mut impl AnalogPort,
        delay: &mut impl DelayNs,
    ) -> Result<f32, SensorError> {
        let filtered = self.read_filtered(adc, delay)?;
        Ok(self.calibration.apply(filtered))
    }

    pub fn calibration(&self) -> SalinityCalibration {
        self.calibration
    }

    pub fn set_calibration(&mut self, cal: SalinityCalibration) {
        self.calibration = cal;
    }

    pub fn reader(&self) -> &FilteredAnalogReader {
        &self.reader
    }
}
