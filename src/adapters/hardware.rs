//! Hardware adapter: bridges the ESP32 ADC to the [`AnalogPort`] trait.
//!
//! This is the only place that knows which ADC1 channel each analog
//! probe sits on.  On non-espidf targets the reads come from the
//! simulated ADC in [`hw_init`](crate::drivers::hw_init).

use crate::app::ports::{AnalogPin, AnalogPort};
use crate::drivers::hw_init;
use crate::pins;

/// ADC1 channel wired to `pin` on the HiGrow board.
pub const fn adc1_channel(pin: AnalogPin) -> u32 {
    match pin {
        AnalogPin::Soil => pins::ADC1_CH_SOIL,
        AnalogPin::Battery => pins::ADC1_CH_BATTERY,
        AnalogPin::Salinity => pins::ADC1_CH_SALINITY,
    }
}

/// The board's three analog probes behind one port.
#[derive(Debug, Default)]
pub struct HiGrowAnalog;

impl HiGrowAnalog {
    pub fn new() -> Self {
        Self
    }
}

impl AnalogPort for HiGrowAnalog {
    fn read_raw(&mut self, pin: AnalogPin) -> u16 {
        hw_init::adc1_read(adc1_channel(pin))
    }
}

/// Set the simulated reading for `pin` (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(pin: AnalogPin, raw: u16) {
    hw_init::sim_set_adc1(adc1_channel(pin), raw);
}
