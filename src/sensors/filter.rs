//! Trimmed-mean filter for noisy analog channels.
//!
//! A window of raw ADC samples is sorted and the single lowest and single
//! highest sample are discarded; the remainder is averaged with truncating
//! integer division.  This rejects one-sample spikes (contact noise on the
//! salinity probe) while staying integer-valued and unscaled.
//!
//! Two ways to fill a window:
//!
//! - [`FilteredAnalogReader::read`] blocks for `window_len × sample_delay_ms`
//!   (≈240 ms at the defaults).  Nothing else runs on the loop meanwhile.
//! - [`WindowAccumulator`] takes one sample per call so a caller can spread
//!   the window across scheduler ticks instead.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::debug;

use crate::app::ports::{AnalogPin, AnalogPort};
use crate::error::SensorError;

/// Largest supported window (fixed stack buffer).
pub const MAX_WINDOW: usize = 256;

/// Smallest window a trimmed mean is defined for.
pub const MIN_WINDOW: usize = 3;

/// Reference configuration: 120 samples, 2 ms apart.
pub const DEFAULT_WINDOW: usize = 120;
pub const DEFAULT_SAMPLE_DELAY_MS: u32 = 2;

/// Sort `window` in place and return `sum(sorted[1..n-1]) / (n - 2)`.
pub fn trimmed_mean(window: &mut [u16]) -> Result<u32, SensorError> {
    let n = window.len();
    if n < MIN_WINDOW {
        return Err(SensorError::WindowTooSmall);
    }
    window.sort_unstable();
    let sum: u64 = window[1..n - 1].iter().map(|&s| u64::from(s)).sum();
    Ok((sum / (n as u64 - 2)) as u32)
}

fn check_window_len(len: usize) -> Result<(), SensorError> {
    if len < MIN_WINDOW {
        Err(SensorError::WindowTooSmall)
    } else if len > MAX_WINDOW {
        Err(SensorError::WindowTooLarge)
    } else {
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Incremental accumulator
// ───────────────────────────────────────────────────────────────

/// Collects samples one at a time and yields a filtered reading each time
/// the window fills.  The window is cleared after every reduction.
#[derive(Debug, Clone)]
pub struct WindowAccumulator {
    window_len: usize,
    samples: Vec<u16, MAX_WINDOW>,
}

impl WindowAccumulator {
    pub fn new(window_len: usize) -> Result<Self, SensorError> {
        check_window_len(window_len)?;
        Ok(Self {
            window_len,
            samples: Vec::new(),
        })
    }

    /// Add one sample.  Returns the trimmed mean once `window_len` samples
    /// have been pushed, `None` while the window is still filling.
    pub fn push(&mut self, sample: u16) -> Option<u32> {
        // Capacity is checked in `new`, the push cannot fail.
        let _ = self.samples.push(sample);
        if self.samples.len() < self.window_len {
            return None;
        }
        let mean = trimmed_mean(&mut self.samples).ok();
        self.samples.clear();
        mean
    }

    /// Samples collected towards the current window.
    pub fn pending(&self) -> usize {
        self.samples.len()
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Drop a partially filled window.
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

// ───────────────────────────────────────────────────────────────
// Blocking reader
// ───────────────────────────────────────────────────────────────

/// Blocking window sampler for one analog pin.
#[derive(Debug, Clone, Copy)]
pub struct FilteredAnalogReader {
    window_len: usize,
    sample_delay_ms: u32,
}

impl Default for FilteredAnalogReader {
    fn default() -> Self {
        Self {
            window_len: DEFAULT_WINDOW,
            sample_delay_ms: DEFAULT_SAMPLE_DELAY_MS,
        }
    }
}

impl FilteredAnalogReader {
    pub fn new(window_len: usize, sample_delay_ms: u32) -> Result<Self, SensorError> {
        check_window_len(window_len)?;
        Ok(Self {
            window_len,
            sample_delay_ms,
        })
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn sample_delay_ms(&self) -> u32 {
        self.sample_delay_ms
    }

    /// Wall-clock time one [`read`](Self::read) blocks for.  Saturates.
    pub fn blocking_ms(&self) -> u32 {
        (self.window_len as u32).saturating_mul(self.sample_delay_ms)
    }

    /// Take a full window from `pin` and reduce it.
    ///
    /// Pauses `sample_delay_ms` after every sample.  Not reentrant.
    pub fn read(
        &self,
        adc: &mut impl AnalogPort,
        pin: AnalogPin,
        delay: &mut impl DelayNs,
    ) -> Result<u32, SensorError> {
        let mut acc = WindowAccumulator::new(self.window_len)?;
        loop {
            let sample = adc.read_raw(pin);
            delay.delay_ms(self.sample_delay_ms);
            if let Some(mean) = acc.push(sample) {
                debug!("{:?}: trimmed mean {} over {} samples", pin, mean, self.window_len);
                return Ok(mean);
            }
        }
    }
}
