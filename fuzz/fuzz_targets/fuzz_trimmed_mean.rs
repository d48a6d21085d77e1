//! Fuzz target: `trimmed_mean`
//!
//! Interprets the input as little-endian u16 samples (masked to 12 bits)
//! and checks:
//! - No panics for any window length
//! - Windows shorter than 3 are rejected
//! - The result lies between the smallest and largest sample
//!
//! cargo fuzz run fuzz_trimmed_mean

#![no_main]

use higrow::error::SensorError;
use higrow::sensors::filter::{trimmed_mean, MAX_WINDOW};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut samples: Vec<u16> = data
        .chunks_exact(2)
        .take(MAX_WINDOW)
        .map(|c| u16::from_le_bytes([c[0], c[1]]) & 0x0FFF)
        .collect();

    let lo = samples.iter().copied().min();
    let hi = samples.iter().copied().max();

    match trimmed_mean(&mut samples) {
        Ok(m) => {
            assert!(samples.len() >= 3);
            assert!(u32::from(lo.unwrap_or(0)) <= m && m <= u32::from(hi.unwrap_or(0)));
        }
        Err(e) => {
            assert!(samples.len() < 3);
            assert_eq!(e, SensorError::WindowTooSmall);
        }
    }
});
