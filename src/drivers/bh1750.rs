//! BH1750 ambient light sensor over I²C.
//!
//! Only the handful of opcodes the bridge needs: power on, select a
//! measurement mode, read the 16-bit result.

use embedded_hal::i2c::I2c;
use log::debug;

use crate::app::ports::{LightMode, LightSensor};
use crate::error::SensorError;

const POWER_ON: u8 = 0x01;

/// Counts per lux in the high-resolution modes.
const COUNTS_PER_LUX: f32 = 1.2;

const fn opcode(mode: LightMode) -> u8 {
    match mode {
        LightMode::ContinuousHighRes => 0x10,
        LightMode::ContinuousHighRes2 => 0x11,
        LightMode::ContinuousLowRes => 0x13,
        LightMode::OneTimeHighRes => 0x20,
    }
}

pub struct Bh1750<I2C> {
    i2c: I2C,
    address: u8,
    mode: LightMode,
}

impl<I2C: I2c> Bh1750<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            mode: LightMode::default(),
        }
    }

    pub fn mode(&self) -> LightMode {
        self.mode
    }
}

impl<I2C: I2c> LightSensor for Bh1750<I2C> {
    fn init(&mut self, mode: LightMode) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[POWER_ON])
            .and_then(|()| self.i2c.write(self.address, &[opcode(mode)]))
            .map_err(|e| {
                debug!("BH1750 @0x{:02x}: {:?}", self.address, e);
                SensorError::NotDetected
            })?;
        self.mode = mode;
        Ok(())
    }

    /// NaN when the bus transaction fails.
    fn lux(&mut self) -> f32 {
        let mut buf = [0u8; 2];
        if let Err(e) = self.i2c.read(self.address, &mut buf) {
            debug!("BH1750 read: {:?}", e);
            return f32::NAN;
        }
        let lux = f32::from(u16::from_be_bytes(buf)) / COUNTS_PER_LUX;
        match self.mode {
            // Half-lux resolution: one count is 0.5 lx.
            LightMode::ContinuousHighRes2 => lux / 2.0,
            _ => lux,
        }
    }
}
