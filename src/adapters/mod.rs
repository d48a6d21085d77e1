//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements                        | Connects to            |
//! |-----------------|-----------------------------------|------------------------|
//! | `hardware`      | AnalogPort                        | ESP32 ADC1             |
//! | `environmental` | EnvironmentalSensor               | BME280 on I²C          |
//! | `absent`        | all bus ports, for `Option<T>`    | nothing (fallback)     |
//! | `log_sink`      | ReportSink                        | Serial log output      |
//! | `time`          | (monotonic clock)                 | ESP32 system timer     |
//!
//! The BH1750 and DHT12 drivers live in [`crate::drivers`].

pub mod absent;
pub mod environmental;
pub mod hardware;
pub mod log_sink;
pub mod time;
