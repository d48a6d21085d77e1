//! Outbound measurement values.
//!
//! The [`Dispatcher`](super::dispatcher::Dispatcher) hands these to the
//! [`ReportSink`](super::ports::ReportSink) port.  The sink decides how a
//! `(channel, value, unit)` triple is framed for the dashboard.

use super::channels::ChannelId;

/// Unit tag attached to every reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    HectoPascal,
    Meter,
    RelativeHumidity,
    Millivolt,
    Lux,
    /// On/off state, value is `0.0` or `1.0`.
    Digital,
}

impl Unit {
    /// Dashboard data-type tag.
    pub const fn type_tag(self) -> &'static str {
        match self {
            Self::Celsius => "temp",
            Self::HectoPascal => "bp",
            Self::Meter => "alt",
            Self::RelativeHumidity => "rel_hum",
            Self::Millivolt => "voltage",
            Self::Lux => "lum",
            Self::Digital => "digital_sensor",
        }
    }

    /// Dashboard unit tag.
    pub const fn unit_tag(self) -> &'static str {
        match self {
            Self::Celsius => "c",
            Self::HectoPascal => "hpa",
            Self::Meter => "m",
            Self::RelativeHumidity => "p",
            Self::Millivolt => "mv",
            Self::Lux => "lux",
            Self::Digital => "d",
        }
    }
}

/// A calibrated physical value bound to its channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub channel: ChannelId,
    pub value: f32,
    pub unit: Unit,
}

impl Measurement {
    pub fn new(channel: impl Into<ChannelId>, value: f32, unit: Unit) -> Self {
        Self {
            channel: channel.into(),
            value,
            unit,
        }
    }

    /// Digital on/off measurement.
    pub fn digital(channel: impl Into<ChannelId>, on: bool) -> Self {
        Self::new(channel, if on { 1.0 } else { 0.0 }, Unit::Digital)
    }
}
