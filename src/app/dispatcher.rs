//! Periodic reporting dispatcher: the application core.
//!
//! Each logical channel is bound to one [`ChannelReader`].  When the
//! scheduler says a channel is due, the dispatcher invokes that reader once
//! against the shared sensor state and forwards the result to the
//! [`ReportSink`].  Inbound commands go the other way: they are routed by
//! channel to a [`CommandHandler`].
//!
//! ```text
//!  Scheduler ──▶ ┌──────────────────────────┐ ──▶ ReportSink
//!                │        Dispatcher         │
//!  Transport ──▶ │  readers · handlers       │ ──▶ OutputPin
//!                └──────────────────────────┘
//! ```
//!
//! Everything runs on one thread.  A report runs to completion (including
//! the blocking salinity window) before the next report or command is
//! looked at.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::sensors::SensorContext;

use super::channels::{Channel, ChannelId};
use super::commands::{ButtonEvent, CommandHandler, CommandOutcome, NotWired};
use super::measurement::Measurement;
use super::ports::{
    AnalogPort, ClimateProbe, EnvironmentalSensor, LightSensor, ReportSink, SchedulerDelegate,
};

/// Maximum number of channels with a reader.
pub const MAX_READERS: usize = 16;
/// Maximum number of channels with a command handler.
pub const MAX_HANDLERS: usize = 8;

// ───────────────────────────────────────────────────────────────
// Readers
// ───────────────────────────────────────────────────────────────

/// Produces one value for a channel from the shared sensor state `S`.
///
/// `None` means "nothing to report this cycle" (sensor unavailable or a
/// transient read failure).
pub trait ChannelReader<S> {
    fn produce(&mut self, sensors: &mut S) -> Option<Measurement>;
}

impl<S, F> ChannelReader<S> for F
where
    F: FnMut(&mut S) -> Option<Measurement>,
{
    fn produce(&mut self, sensors: &mut S) -> Option<Measurement> {
        self(sensors)
    }
}

/// Channel → reader table.
pub struct ReaderTable<S> {
    entries: Vec<(ChannelId, Box<dyn ChannelReader<S>>), MAX_READERS>,
}

impl<S> Default for ReaderTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ReaderTable<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind `reader` to `channel`, replacing any previous binding.
    pub fn register(
        &mut self,
        channel: impl Into<ChannelId>,
        reader: impl ChannelReader<S> + 'static,
    ) -> Result<()> {
        let channel = channel.into();
        let reader: Box<dyn ChannelReader<S>> = Box::new(reader);
        if let Some(slot) = self.entries.iter_mut().find(|(c, _)| *c == channel) {
            slot.1 = reader;
            return Ok(());
        }
        self.entries
            .push((channel, reader))
            .map_err(|_| Error::Config("reader table full"))
    }

    pub fn contains(&self, channel: ChannelId) -> bool {
        self.entries.iter().any(|(c, _)| *c == channel)
    }

    /// Registered channels in registration order.
    pub fn channels(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_mut(&mut self, channel: ChannelId) -> Option<&mut Box<dyn ChannelReader<S>>> {
        self.entries
            .iter_mut()
            .find(|(c, _)| *c == channel)
            .map(|(_, r)| r)
    }
}

/// The reference channel map: one reader per sensor channel.
pub fn default_readers<A, E, C, L, D>() -> ReaderTable<SensorContext<A, E, C, L, D>>
where
    A: AnalogPort + 'static,
    E: EnvironmentalSensor + 'static,
    C: ClimateProbe + 'static,
    L: LightSensor + 'static,
    D: DelayNs + 'static,
{
    let mut table = ReaderTable::new();
    let bindings: [(Channel, fn(&mut SensorContext<A, E, C, L, D>) -> Option<Measurement>); 9] = [
        (Channel::EnvTemperature, SensorContext::env_temperature),
        (Channel::Barometer, SensorContext::barometer),
        (Channel::Altitude, SensorContext::altitude),
        (Channel::ProbeTemperature, SensorContext::probe_temperature),
        (Channel::ProbeHumidity, SensorContext::probe_humidity),
        (Channel::Battery, SensorContext::battery),
        (Channel::Light, SensorContext::light),
        (Channel::Soil, SensorContext::soil),
        (Channel::Salinity, SensorContext::salinity_percent),
    ];
    for (channel, reader) in bindings {
        // Nine bindings always fit in MAX_READERS.
        let _ = table.register(channel, reader);
    }
    table
}

// ───────────────────────────────────────────────────────────────
// Dispatcher
// ───────────────────────────────────────────────────────────────

/// Result of one report attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// A value was forwarded to the sink.
    Reported,
    /// The reader produced nothing this cycle.
    Skipped,
    /// No reader is bound to the channel.
    NoReader,
}

pub struct Dispatcher<S> {
    readers: ReaderTable<S>,
    handlers: Vec<(ChannelId, Box<dyn CommandHandler>), MAX_HANDLERS>,
    reports_sent: u32,
}

impl<S> Dispatcher<S> {
    /// Build a dispatcher over `readers`.  Channel 1 gets the
    /// [`NotWired`] placeholder so its commands are logged explicitly.
    pub fn new(readers: ReaderTable<S>) -> Self {
        let mut d = Self {
            readers,
            handlers: Vec::new(),
            reports_sent: 0,
        };
        // Empty table, cannot be full.
        let _ = d.register_handler(Channel::EnvTemperature, NotWired);
        d
    }

    /// Bind a command handler to `channel`, replacing any previous one.
    pub fn register_handler(
        &mut self,
        channel: impl Into<ChannelId>,
        handler: impl CommandHandler + 'static,
    ) -> Result<()> {
        let channel = channel.into();
        let handler: Box<dyn CommandHandler> = Box::new(handler);
        if let Some(slot) = self.handlers.iter_mut().find(|(c, _)| *c == channel) {
            slot.1 = handler;
            return Ok(());
        }
        self.handlers
            .push((channel, handler))
            .map_err(|_| Error::Config("command handler table full"))
    }

    pub fn readers(&self) -> &ReaderTable<S> {
        &self.readers
    }

    pub fn readers_mut(&mut self) -> &mut ReaderTable<S> {
        &mut self.readers
    }

    /// Values forwarded to a sink since startup.
    pub fn reports_sent(&self) -> u32 {
        self.reports_sent
    }

    // ── Outbound ──────────────────────────────────────────────

    /// Run the reader bound to `channel` once and forward its value.
    pub fn report(
        &mut self,
        channel: ChannelId,
        sensors: &mut S,
        sink: &mut impl ReportSink,
    ) -> ReportOutcome {
        let Some(reader) = self.readers.get_mut(channel) else {
            warn!("REPORT | channel {} has no reader", channel);
            return ReportOutcome::NoReader;
        };
        match reader.produce(sensors) {
            Some(m) => {
                sink.report(&m);
                self.reports_sent = self.reports_sent.wrapping_add(1);
                ReportOutcome::Reported
            }
            None => {
                debug!("REPORT | channel {} skipped", channel);
                ReportOutcome::Skipped
            }
        }
    }

    /// One pass over every registered channel.  Returns how many values
    /// were reported.
    pub fn report_all(&mut self, sensors: &mut S, sink: &mut impl ReportSink) -> usize {
        let channels: Vec<ChannelId, MAX_READERS> = self.readers.channels().collect();
        let mut reported = 0;
        for channel in channels {
            if self.report(channel, sensors, sink) == ReportOutcome::Reported {
                reported += 1;
            }
        }
        reported
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Route an inbound command to its channel's handler.
    ///
    /// Unknown channels are logged and otherwise ignored; nothing is
    /// reported back to the transport.
    pub fn handle_command(
        &mut self,
        channel: ChannelId,
        value: f32,
        sink: &mut impl ReportSink,
    ) -> CommandOutcome {
        match self.handlers.iter_mut().find(|(c, _)| *c == channel) {
            Some((_, handler)) => handler.apply(channel, value, sink),
            None => {
                warn!("CMD | channel {} value {} unrecognised", channel, value);
                CommandOutcome::Unrecognized
            }
        }
    }

    /// Forward a button gesture as a digital value on the proximity channel.
    pub fn on_button(&mut self, event: ButtonEvent, sink: &mut impl ReportSink) {
        let pressed = event == ButtonEvent::LongPressStart;
        info!("BUTTON | {:?}", event);
        sink.report(&Measurement::digital(Channel::Proximity, pressed));
        self.reports_sent = self.reports_sent.wrapping_add(1);
    }
}

/// Bridges scheduler fire notifications to [`Dispatcher::report`].
pub struct ReportDelegate<'a, S, K> {
    pub dispatcher: &'a mut Dispatcher<S>,
    pub sensors: &'a mut S,
    pub sink: &'a mut K,
}

impl<S, K: ReportSink> SchedulerDelegate for ReportDelegate<'_, S, K> {
    fn on_channel_due(&mut self, channel: ChannelId) {
        self.dispatcher
            .report(channel, &mut *self.sensors, &mut *self.sink);
    }
}
