//! Per-channel report timer.
//!
//! Each registered channel has its own periodic interval.  The main loop
//! calls [`Scheduler::tick`] once per loop iteration; when a channel's
//! interval has elapsed the scheduler notifies a [`SchedulerDelegate`],
//! which in the firmware is the dispatcher's
//! [`ReportDelegate`](crate::app::dispatcher::ReportDelegate).
//!
//! ```text
//!  main loop ──tick()──▶ Scheduler ──on_channel_due(ch)──▶ Dispatcher::report
//! ```
//!
//! Time is measured, not counted: the loop passes the milliseconds that
//! really elapsed since the previous tick, so a slow salinity window or a
//! late wake-up does not stretch the report period.  Channels due on the
//! same tick fire in registration order; [`Scheduler::stagger`] spreads
//! them across the interval instead.

use heapless::Vec;
use log::info;

use crate::app::channels::ChannelId;
use crate::app::ports::SchedulerDelegate;
use crate::error::{Error, Result};

/// Maximum number of scheduled channels (stack-allocated).
pub const MAX_SCHEDULES: usize = 16;

/// Internal bookkeeping for one channel.
#[derive(Debug, Clone)]
struct ScheduleEntry {
    channel: ChannelId,
    interval_ms: u64,
    /// Time accumulated since last fire.
    elapsed_ms: u64,
    enabled: bool,
}

/// The scheduler engine.
///
/// Decoupled from the dispatcher: it only knows channel ids and calls the
/// delegate, so it can be tested with a recording delegate.
pub struct Scheduler {
    entries: Vec<ScheduleEntry, MAX_SCHEDULES>,
    /// Global enable flag.
    enabled: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            enabled: true,
        }
    }

    /// Report `channel` every `interval_secs`.  Re-adding a channel
    /// replaces its interval and restarts its timer.
    pub fn add(&mut self, channel: impl Into<ChannelId>, interval_secs: u32) -> Result<()> {
        let channel = channel.into();
        if interval_secs == 0 {
            return Err(Error::Config("schedule interval must be non-zero"));
        }
        let entry = ScheduleEntry {
            channel,
            interval_ms: u64::from(interval_secs) * 1_000,
            elapsed_ms: 0,
            enabled: true,
        };
        if let Some(slot) = self.entries.iter_mut().find(|e| e.channel == channel) {
            *slot = entry;
        } else {
            self.entries
                .push(entry)
                .map_err(|_| Error::Config("scheduler full"))?;
        }
        info!("Scheduler: channel {} every {}s", channel, interval_secs);
        Ok(())
    }

    /// Stop reporting `channel`.
    pub fn remove(&mut self, channel: ChannelId) {
        if let Some(pos) = self.entries.iter().position(|e| e.channel == channel) {
            self.entries.remove(pos);
            info!("Scheduler: channel {} removed", channel);
        }
    }

    /// Pause or resume one channel without losing its interval.
    pub fn set_channel_enabled(&mut self, channel: ChannelId, enabled: bool) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.channel == channel) {
            e.enabled = enabled;
            e.elapsed_ms = 0;
        }
    }

    /// Offset each entry's phase so the `n` channels fall due at evenly
    /// spaced points of their interval rather than all at once.  Entry `k`
    /// starts `k / n` of the way through its interval.
    pub fn stagger(&mut self) {
        let n = self.entries.len() as u64;
        for (k, entry) in self.entries.iter_mut().enumerate() {
            entry.elapsed_ms = entry.interval_ms * k as u64 / n;
        }
    }

    /// Enable or disable the entire scheduler.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Tick the scheduler.  Call once per loop iteration.
    ///
    /// * `elapsed_ms`: wall time since the previous tick.
    /// * `delegate`: receives `on_channel_due` for every channel whose
    ///   interval elapsed on this tick.
    ///
    /// A channel fires at most once per tick; any overshoot carries into
    /// the next period, modulo the interval.
    pub fn tick(&mut self, elapsed_ms: u32, delegate: &mut dyn SchedulerDelegate) {
        if !self.enabled {
            return;
        }

        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            entry.elapsed_ms += u64::from(elapsed_ms);
            if entry.elapsed_ms >= entry.interval_ms {
                delegate.on_channel_due(entry.channel);
                entry.elapsed_ms %= entry.interval_ms;
            }
        }
    }

    /// Number of enabled channels.
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.enabled).count()
    }
}
