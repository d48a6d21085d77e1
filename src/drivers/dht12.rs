//! DHT12 temperature / humidity sensor in single-bus mode.
//!
//! The data line is open-drain with a pull-up.  A transaction is:
//!
//! ```text
//! host   ‾‾‾\______1ms______/‾‾
//! sensor                       \__80us__/‾‾80us‾‾\ then 40 bits:
//! bit    \__50us__/‾‾26us‾‾   = 0
//!        \__50us__/‾‾70us‾‾‾‾ = 1
//! ```
//!
//! Frame: humidity int, humidity tenths, temperature int, temperature
//! tenths (bit 7 = negative), checksum (low byte of the sum of the first
//! four).
//!
//! One transaction yields both values, so a temperature read caches the
//! humidity for the following humidity read.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use crate::app::ports::ClimateProbe;
use crate::error::SensorError;

const START_LOW_US: u32 = 1_000;
/// Upper bound on any single level phase.
const PHASE_TIMEOUT_US: u32 = 100;
/// Sample point after a bit's rising edge: past a `0` pulse, inside a `1`.
const BIT_SAMPLE_US: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dht12Error {
    /// The sensor did not drive the expected edge in time.
    Timeout,
    Checksum,
    /// The GPIO driver reported an error.
    Pin,
}

impl From<Dht12Error> for SensorError {
    fn from(_: Dht12Error) -> Self {
        SensorError::ReadFailed
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dht12Reading {
    pub temperature_c: f32,
    pub humidity_percent: f32,
}

/// Validate and decode a raw 5-byte frame.
pub fn decode(frame: [u8; 5]) -> Result<Dht12Reading, Dht12Error> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(Dht12Error::Checksum);
    }
    let humidity = f32::from(frame[0]) + f32::from(frame[1]) * 0.1;
    let magnitude = f32::from(frame[2]) + f32::from(frame[3] & 0x7F) * 0.1;
    let temperature = if frame[3] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };
    Ok(Dht12Reading {
        temperature_c: temperature,
        humidity_percent: humidity,
    })
}

pub struct Dht12<P, D> {
    pin: P,
    delay: D,
    cached_humidity: Option<f32>,
}

impl<P, D> Dht12<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            cached_humidity: None,
        }
    }

    /// Run one bus transaction.
    pub fn read(&mut self) -> Result<Dht12Reading, Dht12Error> {
        let frame = self.read_frame()?;
        decode(frame)
    }

    fn read_frame(&mut self) -> Result<[u8; 5], Dht12Error> {
        self.pin.set_low().map_err(|_| Dht12Error::Pin)?;
        self.delay.delay_us(START_LOW_US);
        self.pin.set_high().map_err(|_| Dht12Error::Pin)?;

        // Response: low 80us, high 80us, then the first bit's low phase.
        self.wait_for(false)?;
        self.wait_for(true)?;
        self.wait_for(false)?;

        let mut frame = [0u8; 5];
        for byte in &mut frame {
            for _ in 0..8 {
                self.wait_for(true)?;
                self.delay.delay_us(BIT_SAMPLE_US);
                let one = self.pin.is_high().map_err(|_| Dht12Error::Pin)?;
                *byte = (*byte << 1) | u8::from(one);
                if one {
                    self.wait_for(false)?;
                }
            }
        }
        Ok(frame)
    }

    fn wait_for(&mut self, high: bool) -> Result<(), Dht12Error> {
        for _ in 0..PHASE_TIMEOUT_US {
            if self.pin.is_high().map_err(|_| Dht12Error::Pin)? == high {
                return Ok(());
            }
            self.delay.delay_us(1);
        }
        Err(Dht12Error::Timeout)
    }
}

impl<P, D> ClimateProbe for Dht12<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn init(&mut self) {
        // Idle the line high.
        if self.pin.set_high().is_err() {
            debug!("DHT12: could not release data line");
        }
    }

    fn temperature_c(&mut self) -> Result<f32, SensorError> {
        self.cached_humidity = None;
        match self.read() {
            Ok(r) => {
                self.cached_humidity = Some(r.humidity_percent);
                Ok(r.temperature_c)
            }
            Err(e) => {
                debug!("DHT12: {:?}", e);
                Err(e.into())
            }
        }
    }

    fn humidity_percent(&mut self) -> Result<f32, SensorError> {
        if let Some(h) = self.cached_humidity.take() {
            return Ok(h);
        }
        self.read().map(|r| r.humidity_percent).map_err(|e| {
            debug!("DHT12: {:?}", e);
            e.into()
        })
    }
}
