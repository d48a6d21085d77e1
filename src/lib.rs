//! HiGrow soil-sensor bridge library.
//!
//! Exposes the pure-logic modules for integration testing and the firmware
//! binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod scheduler;
pub mod sensors;

// Hardware-facing modules; the device implementations are guarded by cfg
// attributes inside, host builds get simulation stubs.
pub mod adapters;
pub mod drivers;
