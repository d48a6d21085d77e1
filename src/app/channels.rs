//! Logical channel map.
//!
//! A channel number is the join key between a reader in the
//! [`Dispatcher`](super::dispatcher::Dispatcher) and the dashboard's
//! addressing scheme.  The numbering below matches the widgets configured
//! on the dashboard and is static for the process lifetime.

/// Raw channel identifier as used on the wire.  Inbound commands may carry
/// any value, so this is wider than the known channel range.
pub type ChannelId = u32;

/// Channels the firmware knows how to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    /// Combo sensor temperature (°C).
    EnvTemperature = 1,
    /// Combo sensor barometric pressure (hPa).
    Barometer = 2,
    /// Combo sensor altitude estimate (m).
    Altitude = 3,
    /// Secondary probe temperature (°C).
    ProbeTemperature = 4,
    /// Secondary probe relative humidity (%).
    ProbeHumidity = 5,
    /// Battery voltage (mV).
    Battery = 6,
    /// Ambient light (lux).
    Light = 7,
    /// Soil moisture (%).
    Soil = 8,
    /// Salinity (%).
    Salinity = 9,
    /// User button long-press state (digital).
    Proximity = 10,
}

impl Channel {
    /// Every known channel, in report order.
    pub const ALL: [Channel; 10] = [
        Channel::EnvTemperature,
        Channel::Barometer,
        Channel::Altitude,
        Channel::ProbeTemperature,
        Channel::ProbeHumidity,
        Channel::Battery,
        Channel::Light,
        Channel::Soil,
        Channel::Salinity,
        Channel::Proximity,
    ];

    pub const fn id(self) -> ChannelId {
        self as ChannelId
    }

    pub fn from_id(id: ChannelId) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl From<Channel> for ChannelId {
    fn from(c: Channel) -> Self {
        c.id()
    }
}
