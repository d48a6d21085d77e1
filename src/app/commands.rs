//! Inbound commands and their handlers.
//!
//! The dashboard transport delivers `(channel, value)` pairs at arbitrary
//! times.  The [`Dispatcher`](super::dispatcher::Dispatcher) routes each one
//! to the [`CommandHandler`] registered for that channel.

use embedded_hal::digital::{OutputPin, PinState};
use log::{info, warn};

use super::channels::ChannelId;
use super::measurement::Measurement;
use super::ports::ReportSink;

/// What happened to an inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A handler changed local state.
    Applied,
    /// A placeholder handler logged the command; nothing changed.
    Logged,
    /// No handler is registered for the channel; nothing changed.
    Unrecognized,
    /// The handler could not apply the value.
    Failed,
}

/// User button gestures forwarded to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    LongPressStart,
    LongPressStop,
}

/// Handles commands for one channel.
pub trait CommandHandler {
    fn apply(&mut self, channel: ChannelId, value: f32, sink: &mut dyn ReportSink)
        -> CommandOutcome;
}

/// Placeholder for a channel the dashboard can write to but that has no
/// local effect yet.  Logs and changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotWired;

impl CommandHandler for NotWired {
    fn apply(
        &mut self,
        channel: ChannelId,
        value: f32,
        _sink: &mut dyn ReportSink,
    ) -> CommandOutcome {
        info!("CMD | channel {} value {} (not wired)", channel, value);
        CommandOutcome::Logged
    }
}

/// Drives a digital output from a command and echoes the applied state
/// back on the same channel so the dashboard widget reflects reality.
pub struct DigitalEcho<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> DigitalEcho<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl<P: OutputPin> CommandHandler for DigitalEcho<P> {
    fn apply(
        &mut self,
        channel: ChannelId,
        value: f32,
        sink: &mut dyn ReportSink,
    ) -> CommandOutcome {
        if value.is_nan() {
            warn!("CMD | channel {} rejected NaN value", channel);
            return CommandOutcome::Failed;
        }
        let on = value != 0.0;
        if self.pin.set_state(PinState::from(on)).is_err() {
            warn!("CMD | channel {} output write failed", channel);
            return CommandOutcome::Failed;
        }
        self.on = on;
        info!("CMD | channel {} output {}", channel, if on { "HIGH" } else { "LOW" });
        sink.report(&Measurement::digital(channel, on));
        CommandOutcome::Applied
    }
}
