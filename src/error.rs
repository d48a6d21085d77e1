//! Unified error types for the HiGrow firmware.
//!
//! A single `Error` enum that every subsystem can convert into.  All
//! variants are `Copy` so they can be passed through the reporting path
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned unusable data.
    Sensor(SensorError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The driver did not answer during initialisation.
    NotDetected,
    /// The driver reported a failed measurement (NaN from the vendor API).
    ReadFailed,
    /// A trimmed mean needs at least three samples.
    WindowTooSmall,
    /// The sample window exceeds the fixed buffer capacity.
    WindowTooLarge,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDetected => write!(f, "sensor not detected"),
            Self::ReadFailed => write!(f, "read failed"),
            Self::WindowTooSmall => write!(f, "sample window smaller than 3"),
            Self::WindowTooLarge => write!(f, "sample window exceeds capacity"),
        }
    }
}

impl core::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_error_converts_and_displays() {
        let e: Error = SensorError::WindowTooSmall.into();
        assert_eq!(e, Error::Sensor(SensorError::WindowTooSmall));
        assert_eq!(e.to_string(), "sensor: sample window smaller than 3");
    }
}
