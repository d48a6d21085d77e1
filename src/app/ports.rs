//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SensorContext / Dispatcher (domain)
//! ```
//!
//! Driven adapters (ADC, vendor sensor drivers, the dashboard transport)
//! implement these traits.  The domain consumes them via generics, so the
//! sampling and scaling logic never touches hardware directly.
//!
//! Delays and digital outputs use the `embedded-hal` 1.0 traits directly
//! (`DelayNs`, `OutputPin`); only the seams `embedded-hal` does not cover
//! are defined here.

use crate::error::SensorError;

use super::channels::ChannelId;
use super::measurement::Measurement;

// ───────────────────────────────────────────────────────────────
// Analog input (driven adapter: ADC → domain)
// ───────────────────────────────────────────────────────────────

/// Analog inputs wired on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogPin {
    Soil,
    Battery,
    Salinity,
}

/// Synchronous 12-bit ADC.
///
/// Always returns a value in `0..=4095`; a disconnected probe is
/// indistinguishable from a valid low reading.
pub trait AnalogPort {
    fn read_raw(&mut self, pin: AnalogPin) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Vendor driver ports
// ───────────────────────────────────────────────────────────────

/// Combo temperature / pressure / altitude sensor (BME280 class).
pub trait EnvironmentalSensor {
    fn init(&mut self) -> Result<(), SensorError>;
    fn temperature_c(&mut self) -> f32;
    fn pressure_pa(&mut self) -> f32;
    fn altitude_m(&mut self, sea_level_hpa: f32) -> f32;
}

/// Secondary temperature / humidity probe (DHT12 class).
///
/// Vendor drivers signal a failed read with NaN.  Adapters must convert
/// that to [`SensorError::ReadFailed`] with [`sample_or_nan`] so the domain
/// never interprets a float bit pattern.
pub trait ClimateProbe {
    fn init(&mut self);
    fn temperature_c(&mut self) -> Result<f32, SensorError>;
    fn humidity_percent(&mut self) -> Result<f32, SensorError>;
}

/// Measurement mode for the light sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightMode {
    /// 1 lx resolution, ~120 ms integration, continuous.
    #[default]
    ContinuousHighRes,
    ContinuousHighRes2,
    ContinuousLowRes,
    OneTimeHighRes,
}

/// Ambient light sensor (BH1750 class).
pub trait LightSensor {
    fn init(&mut self, mode: LightMode) -> Result<(), SensorError>;
    fn lux(&mut self) -> f32;
}

/// Convert a NaN-as-failure driver value into a typed result.
pub fn sample_or_nan(value: f32) -> Result<f32, SensorError> {
    if value.is_nan() {
        Err(SensorError::ReadFailed)
    } else {
        Ok(value)
    }
}

// ───────────────────────────────────────────────────────────────
// Report sink (driven adapter: domain → dashboard transport)
// ───────────────────────────────────────────────────────────────

/// Outbound reporting.  Fire-and-forget: the domain never observes
/// delivery success.
pub trait ReportSink {
    fn report(&mut self, measurement: &Measurement);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the dispatcher)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the [`Scheduler`](crate::scheduler::Scheduler)
/// invokes when a channel's report interval has elapsed.
pub trait SchedulerDelegate {
    fn on_channel_due(&mut self, channel: ChannelId);
}
