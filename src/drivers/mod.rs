//! Hardware initialisation, peripheral helpers and sensor drivers.

pub mod bh1750;
pub mod button;
pub mod dht12;
pub mod hw_init;
pub mod watchdog;
