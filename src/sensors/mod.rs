//! Sensor subsystem: sampling, filtering, scaling, and the aggregating
//! [`SensorContext`].
//!
//! The context owns every driver port plus the availability flags and is
//! the single state object the per-channel readers operate on.  It is built
//! once at startup by [`SensorContext::probe`] and then handed to the
//! [`Dispatcher`](crate::app::dispatcher::Dispatcher) on every report.

pub mod availability;
pub mod filter;
pub mod salinity;
pub mod scaling;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::channels::Channel;
use crate::app::measurement::{Measurement, Unit};
use crate::app::ports::{
    AnalogPin, AnalogPort, ClimateProbe, EnvironmentalSensor, LightMode, LightSensor,
    sample_or_nan,
};
use crate::config::BridgeConfig;
use crate::error::Result;

use availability::{SensorAvailability, SensorFamily};
use filter::FilteredAnalogReader;
use salinity::SalinitySensor;

/// Driver ports handed to [`SensorContext::probe`].
pub struct SensorPorts<A, E, C, L, D> {
    pub analog: A,
    pub environmental: E,
    pub probe: C,
    pub light: L,
    pub delay: D,
}

/// Owns every sensor port and the calibration constants.
pub struct SensorContext<A, E, C, L, D> {
    analog: A,
    environmental: E,
    probe: C,
    light: L,
    delay: D,
    availability: SensorAvailability,
    salinity: SalinitySensor,
    battery_vref_mv: u16,
    sea_level_hpa: f32,
}

impl<A, E, C, L, D> SensorContext<A, E, C, L, D>
where
    A: AnalogPort,
    E: EnvironmentalSensor,
    C: ClimateProbe,
    L: LightSensor,
    D: DelayNs,
{
    /// Initialise every driver and record which optional sensors answered.
    ///
    /// A missing optional sensor is logged and leaves its flag false; only
    /// an invalid configuration fails.
    pub fn probe(ports: SensorPorts<A, E, C, L, D>, config: &BridgeConfig) -> Result<Self> {
        config.validate()?;
        let SensorPorts {
            analog,
            mut environmental,
            mut probe,
            mut light,
            delay,
        } = ports;

        probe.init();
        let availability = SensorAvailability::from_init(
            environmental.init(),
            light.init(LightMode::ContinuousHighRes),
        );

        let reader = FilteredAnalogReader::new(
            usize::from(config.salinity_window),
            config.salinity_sample_delay_ms,
        )?;

        Ok(Self {
            analog,
            environmental,
            probe,
            light,
            delay,
            availability,
            salinity: SalinitySensor::new(reader, config.salinity_calibration),
            battery_vref_mv: config.battery_vref_mv,
            sea_level_hpa: config.sea_level_hpa,
        })
    }

    pub fn availability(&self) -> &SensorAvailability {
        &self.availability
    }

    pub fn salinity(&self) -> &SalinitySensor {
        &self.salinity
    }

    fn available(&self, family: SensorFamily) -> bool {
        self.availability.is_available(family)
    }

    /// A bus driver that was detected at boot can still miss one read.
    fn bus_sample(channel: Channel, value: f32, unit: Unit) -> Option<Measurement> {
        match sample_or_nan(value) {
            Ok(v) => Some(Measurement::new(channel, v, unit)),
            Err(e) => {
                debug!("{:?} suppressed: {}", channel, e);
                None
            }
        }
    }

    // ── Combo sensor ──────────────────────────────────────────

    pub fn env_temperature(&mut self) -> Option<Measurement> {
        if !self.available(SensorFamily::Environmental) {
            return None;
        }
        let c = self.environmental.temperature_c();
        Self::bus_sample(Channel::EnvTemperature, c, Unit::Celsius)
    }

    pub fn barometer(&mut self) -> Option<Measurement> {
        if !self.available(SensorFamily::Environmental) {
            return None;
        }
        let hpa = self.environmental.pressure_pa() / 100.0;
        Self::bus_sample(Channel::Barometer, hpa, Unit::HectoPascal)
    }

    pub fn altitude(&mut self) -> Option<Measurement> {
        if !self.available(SensorFamily::Environmental) {
            return None;
        }
        let m = self.environmental.altitude_m(self.sea_level_hpa);
        Self::bus_sample(Channel::Altitude, m, Unit::Meter)
    }

    // ── Secondary probe ───────────────────────────────────────

    pub fn probe_temperature(&mut self) -> Option<Measurement> {
        match self.probe.temperature_c() {
            Ok(c) => Some(Measurement::new(Channel::ProbeTemperature, c, Unit::Celsius)),
            Err(e) => {
                debug!("probe temperature suppressed: {}", e);
                None
            }
        }
    }

    pub fn probe_humidity(&mut self) -> Option<Measurement> {
        match self.probe.humidity_percent() {
            Ok(h) => Some(Measurement::new(
                Channel::ProbeHumidity,
                h,
                Unit::RelativeHumidity,
            )),
            Err(e) => {
                debug!("probe humidity suppressed: {}", e);
                None
            }
        }
    }

    // ── Light ─────────────────────────────────────────────────

    pub fn light(&mut self) -> Option<Measurement> {
        if !self.available(SensorFamily::Light) {
            return None;
        }
        Self::bus_sample(Channel::Light, self.light.lux(), Unit::Lux)
    }

    // ── Analog channels ───────────────────────────────────────

    pub fn battery(&mut self) -> Option<Measurement> {
        let raw = self.analog.read_raw(AnalogPin::Battery);
        let mv = scaling::battery_millivolts(raw, self.battery_vref_mv);
        Some(Measurement::new(Channel::Battery, mv, Unit::Millivolt))
    }

    pub fn soil(&mut self) -> Option<Measurement> {
        let raw = self.analog.read_raw(AnalogPin::Soil);
        let pct = scaling::soil_moisture_percent(raw);
        Some(Measurement::new(
            Channel::Soil,
            f32::from(pct),
            Unit::RelativeHumidity,
        ))
    }

    /// Blocks for one full salinity window.
    pub fn salinity_percent(&mut self) -> Option<Measurement> {
        match self.salinity.read(&mut self.analog, &mut self.delay) {
            Ok(v) => Some(Measurement::new(Channel::Salinity, v, Unit::RelativeHumidity)),
            Err(e) => {
                debug!("salinity read failed: {}", e);
                None
            }
        }
    }
}
