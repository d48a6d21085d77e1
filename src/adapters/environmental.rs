//! BME280 combo sensor on the shared I²C bus.
//!
//! Every read triggers one forced measurement; temperature and pressure
//! are read on separate cycles, so they come from separate conversions.

use bme280::i2c::BME280;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::debug;

use crate::app::ports::EnvironmentalSensor;
use crate::error::SensorError;
use crate::sensors::scaling::pressure_altitude_m;

pub struct Bme280Sensor<I2C, D> {
    device: BME280<I2C>,
    delay: D,
}

impl<I2C, D> Bme280Sensor<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, address: u8, delay: D) -> Self {
        Self {
            device: BME280::new(i2c, address),
            delay,
        }
    }

    fn measure(&mut self) -> Option<bme280::Measurements<I2C::Error>> {
        match self.device.measure(&mut self.delay) {
            Ok(m) => Some(m),
            Err(e) => {
                debug!("BME280 measure failed: {:?}", e);
                None
            }
        }
    }
}

impl<I2C, D> EnvironmentalSensor for Bme280Sensor<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), SensorError> {
        self.device.init(&mut self.delay).map_err(|e| {
            debug!("BME280 init failed: {:?}", e);
            SensorError::NotDetected
        })
    }

    fn temperature_c(&mut self) -> f32 {
        self.measure().map_or(f32::NAN, |m| m.temperature)
    }

    fn pressure_pa(&mut self) -> f32 {
        self.measure().map_or(f32::NAN, |m| m.pressure)
    }

    fn altitude_m(&mut self, sea_level_hpa: f32) -> f32 {
        self.measure()
            .map_or(f32::NAN, |m| pressure_altitude_m(m.pressure, sea_level_hpa))
    }
}
