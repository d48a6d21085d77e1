//! Mock hardware for integration tests.
//!
//! Every mock shares its state through an `Rc` handle so a test can keep
//! driving readings after the mock has been moved into a
//! [`SensorContext`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use higrow::app::measurement::Measurement;
use higrow::app::ports::{
    AnalogPin, AnalogPort, ClimateProbe, EnvironmentalSensor, LightMode, LightSensor, ReportSink,
    sample_or_nan,
};
use higrow::config::BridgeConfig;
use higrow::error::SensorError;
use higrow::sensors::{SensorContext, SensorPorts};

// ── Analog ────────────────────────────────────────────────────

/// Per-pin ADC script.  Queued samples are consumed first, then the pin
/// returns its steady value.
#[derive(Default)]
pub struct AnalogState {
    pub steady: [u16; 3],
    pub queued: [VecDeque<u16>; 3],
    pub reads: [usize; 3],
}

fn slot(pin: AnalogPin) -> usize {
    match pin {
        AnalogPin::Soil => 0,
        AnalogPin::Battery => 1,
        AnalogPin::Salinity => 2,
    }
}

#[derive(Clone, Default)]
pub struct MockAnalog(pub Rc<RefCell<AnalogState>>);

#[allow(dead_code)]
impl MockAnalog {
    pub fn set(&self, pin: AnalogPin, raw: u16) {
        self.0.borrow_mut().steady[slot(pin)] = raw;
    }

    pub fn queue(&self, pin: AnalogPin, samples: impl IntoIterator<Item = u16>) {
        self.0.borrow_mut().queued[slot(pin)].extend(samples);
    }

    pub fn reads(&self, pin: AnalogPin) -> usize {
        self.0.borrow().reads[slot(pin)]
    }
}

impl AnalogPort for MockAnalog {
    fn read_raw(&mut self, pin: AnalogPin) -> u16 {
        let mut s = self.0.borrow_mut();
        let i = slot(pin);
        s.reads[i] += 1;
        match s.queued[i].pop_front() {
            Some(v) => v,
            None => s.steady[i],
        }
    }
}

// ── Combo environmental sensor ────────────────────────────────

/// Steady readings unless `temperature` is scripted (NaN = missed read).
/// Records the sea-level reference the context passes for altitude.
#[derive(Clone)]
pub struct MockEnv {
    pub present: bool,
    pub reads: Rc<Cell<usize>>,
    pub temperature: Rc<RefCell<VecDeque<f32>>>,
    pub sea_level_hpa: Rc<Cell<Option<f32>>>,
}

impl MockEnv {
    pub fn new(present: bool) -> Self {
        Self {
            present,
            reads: Rc::new(Cell::new(0)),
            temperature: Rc::default(),
            sea_level_hpa: Rc::default(),
        }
    }
}

impl EnvironmentalSensor for MockEnv {
    fn init(&mut self) -> Result<(), SensorError> {
        if self.present {
            Ok(())
        } else {
            Err(SensorError::NotDetected)
        }
    }

    fn temperature_c(&mut self) -> f32 {
        self.reads.set(self.reads.get() + 1);
        self.temperature.borrow_mut().pop_front().unwrap_or(22.5)
    }

    fn pressure_pa(&mut self) -> f32 {
        self.reads.set(self.reads.get() + 1);
        101_325.0
    }

    fn altitude_m(&mut self, sea_level_hpa: f32) -> f32 {
        self.reads.set(self.reads.get() + 1);
        self.sea_level_hpa.set(Some(sea_level_hpa));
        120.0
    }
}

// ── Secondary probe ───────────────────────────────────────────

/// Returns scripted raw driver values (NaN = failed read), then `steady`.
#[derive(Clone, Default)]
pub struct MockProbe {
    pub temperature: Rc<RefCell<VecDeque<f32>>>,
    pub humidity: Rc<RefCell<VecDeque<f32>>>,
    pub steady: f32,
}

impl ClimateProbe for MockProbe {
    fn init(&mut self) {}

    fn temperature_c(&mut self) -> Result<f32, SensorError> {
        sample_or_nan(self.temperature.borrow_mut().pop_front().unwrap_or(self.steady))
    }

    fn humidity_percent(&mut self) -> Result<f32, SensorError> {
        sample_or_nan(self.humidity.borrow_mut().pop_front().unwrap_or(self.steady))
    }
}

// ── Light ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockLight {
    pub present: bool,
    pub mode: Rc<Cell<Option<LightMode>>>,
    pub reads: Rc<Cell<usize>>,
}

impl MockLight {
    pub fn new(present: bool) -> Self {
        Self {
            present,
            mode: Rc::new(Cell::new(None)),
            reads: Rc::new(Cell::new(0)),
        }
    }
}

impl LightSensor for MockLight {
    fn init(&mut self, mode: LightMode) -> Result<(), SensorError> {
        self.mode.set(Some(mode));
        if self.present {
            Ok(())
        } else {
            Err(SensorError::NotDetected)
        }
    }

    fn lux(&mut self) -> f32 {
        self.reads.set(self.reads.get() + 1);
        340.0
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Accumulates requested delay instead of sleeping.
#[derive(Clone, Default)]
pub struct MockDelay(pub Rc<Cell<u64>>);

#[allow(dead_code)]
impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + u64::from(ns));
    }
}

// ── Output pin ────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPin(pub Rc<Cell<bool>>);

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

// ── Report sink ───────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub sent: Vec<Measurement>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn on_channel(&self, channel: u32) -> Vec<f32> {
        self.sent
            .iter()
            .filter(|m| m.channel == channel)
            .map(|m| m.value)
            .collect()
    }
}

impl ReportSink for RecordingSink {
    fn report(&mut self, m: &Measurement) {
        self.sent.push(*m);
    }
}

// ── Assembled rig ─────────────────────────────────────────────

pub type MockContext = SensorContext<MockAnalog, MockEnv, MockProbe, MockLight, MockDelay>;

/// Handles kept by the test after the ports move into the context.
pub struct Rig {
    pub analog: MockAnalog,
    pub env: MockEnv,
    pub probe: MockProbe,
    pub light: MockLight,
    pub delay: MockDelay,
}

impl Rig {
    pub fn new(env_present: bool, light_present: bool) -> Self {
        Self {
            analog: MockAnalog::default(),
            env: MockEnv::new(env_present),
            probe: MockProbe {
                steady: 21.0,
                ..Default::default()
            },
            light: MockLight::new(light_present),
            delay: MockDelay::default(),
        }
    }

    pub fn build(&self, config: &BridgeConfig) -> MockContext {
        let ports = SensorPorts {
            analog: self.analog.clone(),
            environmental: self.env.clone(),
            probe: self.probe.clone(),
            light: self.light.clone(),
            delay: self.delay.clone(),
        };
        SensorContext::probe(ports, config).expect("valid config")
    }
}
