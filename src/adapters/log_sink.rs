//! Log-based report sink adapter.
//!
//! Implements [`ReportSink`] by writing each measurement to the ESP-IDF
//! logger (UART / USB-CDC in production), framed the way the dashboard
//! expects it: `channel, type, unit, value`.  An MQTT adapter would
//! implement the same trait.

use log::info;

use crate::app::measurement::{Measurement, Unit};
use crate::app::ports::ReportSink;

/// Adapter that logs every [`Measurement`] to the serial console.
#[derive(Debug, Default)]
pub struct LogReportSink {
    sent: u32,
}

impl LogReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measurements written since startup.
    pub fn sent(&self) -> u32 {
        self.sent
    }
}

impl ReportSink for LogReportSink {
    fn report(&mut self, m: &Measurement) {
        self.sent = self.sent.wrapping_add(1);
        match m.unit {
            Unit::Digital => info!(
                "TELEM | ch={} {} {}",
                m.channel,
                m.unit.type_tag(),
                m.value as u8
            ),
            _ => info!(
                "TELEM | ch={} {},{}={:.2}",
                m.channel,
                m.unit.type_tag(),
                m.unit.unit_tag(),
                m.value
            ),
        }
    }
}
