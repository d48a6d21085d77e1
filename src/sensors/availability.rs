//! Optional-sensor availability.
//!
//! The combo environmental sensor and the light sensor are not populated on
//! every board variant.  Each family gets one flag, derived from the
//! driver's init result at startup.  The flags are immutable once built:
//! the owning [`SensorContext`](super::SensorContext) is constructed before
//! the report loop starts, so every read observes the startup value.
//! A missing sensor stays missing until the context is rebuilt.

use log::{info, warn};

use crate::error::SensorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFamily {
    /// Temperature / pressure / altitude combo sensor.
    Environmental,
    /// Ambient light sensor.
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorAvailability {
    environmental: bool,
    light: bool,
}

impl SensorAvailability {
    /// Record the init results of both optional families.
    pub fn from_init(
        environmental: Result<(), SensorError>,
        light: Result<(), SensorError>,
    ) -> Self {
        Self {
            environmental: Self::record(SensorFamily::Environmental, environmental),
            light: Self::record(SensorFamily::Light, light),
        }
    }

    fn record(family: SensorFamily, result: Result<(), SensorError>) -> bool {
        match result {
            Ok(()) => {
                info!("{:?} sensor detected", family);
                true
            }
            Err(e) => {
                warn!("{:?} sensor unavailable ({}), its channels stay silent", family, e);
                false
            }
        }
    }

    pub fn is_available(&self, family: SensorFamily) -> bool {
        match family {
            SensorFamily::Environmental => self.environmental,
            SensorFamily::Light => self.light,
        }
    }

    /// Families that failed init, for callers that want to re-probe.
    pub fn unavailable(&self) -> impl Iterator<Item = SensorFamily> + '_ {
        [SensorFamily::Environmental, SensorFamily::Light]
            .into_iter()
            .filter(move |f| !self.is_available(*f))
    }
}
