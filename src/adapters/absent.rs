//! Fallbacks for bus sensors that could not be brought up.
//!
//! `None` stands for a board variant without the part, or a bus driver
//! that failed to start.  It fails `init()` (or every read), so the
//! availability flags stay false and the matching channels are never
//! reported.

use log::warn;

use crate::app::ports::{ClimateProbe, EnvironmentalSensor, LightMode, LightSensor};
use crate::error::SensorError;

impl<T: EnvironmentalSensor> EnvironmentalSensor for Option<T> {
    fn init(&mut self) -> Result<(), SensorError> {
        self.as_mut().map_or(Err(SensorError::NotDetected), T::init)
    }

    fn temperature_c(&mut self) -> f32 {
        self.as_mut().map_or(f32::NAN, T::temperature_c)
    }

    fn pressure_pa(&mut self) -> f32 {
        self.as_mut().map_or(f32::NAN, T::pressure_pa)
    }

    fn altitude_m(&mut self, sea_level_hpa: f32) -> f32 {
        self.as_mut()
            .map_or(f32::NAN, |s| s.altitude_m(sea_level_hpa))
    }
}

impl<T: LightSensor> LightSensor for Option<T> {
    fn init(&mut self, mode: LightMode) -> Result<(), SensorError> {
        self.as_mut()
            .map_or(Err(SensorError::NotDetected), |s| s.init(mode))
    }

    fn lux(&mut self) -> f32 {
        self.as_mut().map_or(f32::NAN, T::lux)
    }
}

impl<T: ClimateProbe> ClimateProbe for Option<T> {
    fn init(&mut self) {
        match self {
            Some(s) => s.init(),
            None => warn!("climate sensor: no data line, channels will be suppressed"),
        }
    }

    fn temperature_c(&mut self) -> Result<f32, SensorError> {
        self.as_mut()
            .map_or(Err(SensorError::ReadFailed), T::temperature_c)
    }

    fn humidity_percent(&mut self) -> Result<f32, SensorError> {
        self.as_mut()
            .map_or(Err(SensorError::ReadFailed), T::humidity_percent)
    }
}
