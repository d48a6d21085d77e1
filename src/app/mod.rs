//! Application core: pure domain logic, zero I/O.
//!
//! Channel numbering, the measurement record, inbound command handling and
//! the reporting dispatcher live here.  All interaction with hardware goes
//! through the **port traits** in [`ports`], so this layer is testable
//! without real peripherals.

pub mod channels;
pub mod commands;
pub mod dispatcher;
pub mod measurement;
pub mod ports;
