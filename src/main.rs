//! HiGrow Bridge Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HiGrowAnalog   BME280 · BH1750   DHT12        LogReportSink   │
//! │  (AnalogPort)   (shared I²C bus)  (data line)  (ReportSink)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   SensorContext (filter · scaling · availability)      │    │
//! │  │   Dispatcher (readers · command handlers)              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (per-channel) · LongPressDetector · Watchdog        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::cell::RefCell;

use anyhow::Result;
use embedded_hal_bus::i2c::RefCellDevice;
use esp_idf_hal::delay::{Delay, Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyOutputPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use higrow::adapters::environmental::Bme280Sensor;
use higrow::adapters::hardware::HiGrowAnalog;
use higrow::adapters::log_sink::LogReportSink;
use higrow::adapters::time::MonotonicClock;
use higrow::app::channels::Channel;
use higrow::app::commands::DigitalEcho;
use higrow::app::dispatcher::{default_readers, Dispatcher, ReportDelegate};
use higrow::config::BridgeConfig;
use higrow::drivers::bh1750::Bh1750;
use higrow::drivers::button::LongPressDetector;
use higrow::drivers::dht12::Dht12;
use higrow::drivers::{hw_init, watchdog::Watchdog};
use higrow::error::Error;
use higrow::pins;
use higrow::scheduler::Scheduler;
use higrow::sensors::{SensorContext, SensorPorts};

/// Build-time configuration override (JSON, any subset of fields).
const CONFIG_JSON: Option<&str> = option_env!("HIGROW_CONFIG_JSON");

const I2C_BAUD_HZ: u32 = 100_000;

fn load_config() -> BridgeConfig {
    match CONFIG_JSON.map(BridgeConfig::from_json) {
        Some(Ok(cfg)) => {
            info!("Config loaded from HIGROW_CONFIG_JSON");
            cfg
        }
        Some(Err(e)) => {
            warn!("HIGROW_CONFIG_JSON rejected ({}), using defaults", e);
            BridgeConfig::default()
        }
        None => BridgeConfig::default(),
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  HiGrow bridge v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Hardware: sensor rail, ADC, button ─────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}", e);
        return Err(Error::from(e).into());
    }
    let watchdog = Watchdog::default();
    let peripherals = Peripherals::take()?;

    // ── 3. Configuration ──────────────────────────────────────
    let config = load_config();

    // ── 4. Bus sensors ────────────────────────────────────────
    // Pin numbers mirror pins::I2C_SDA_GPIO / I2C_SCL_GPIO.
    let i2c = match I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio25,
        peripherals.pins.gpio26,
        &I2cConfig::new().baudrate(Hertz(I2C_BAUD_HZ)),
    ) {
        Ok(driver) => {
            info!(
                "I2C0 up on SDA=GPIO{} SCL=GPIO{}",
                pins::I2C_SDA_GPIO,
                pins::I2C_SCL_GPIO
            );
            // Shared by every bus sensor for the life of the firmware.
            Some(&*Box::leak(Box::new(RefCell::new(driver))))
        }
        Err(e) => {
            warn!("I2C0 init failed ({}), bus sensors disabled", e);
            None
        }
    };
    let environmental = i2c.map(|bus| {
        Bme280Sensor::new(RefCellDevice::new(bus), pins::ENV_SENSOR_I2C_ADDR, Ets)
    });
    let light = i2c.map(|bus| Bh1750::new(RefCellDevice::new(bus), pins::LIGHT_SENSOR_I2C_ADDR));

    // Open-drain data line on pins::CLIMATE_PROBE_GPIO.
    let climate = match PinDriver::input_output_od(peripherals.pins.gpio16) {
        Ok(mut line) => {
            if let Err(e) = line.set_pull(Pull::Up) {
                warn!("DHT12 pull-up not set ({})", e);
            }
            Some(Dht12::new(line, Ets))
        }
        Err(e) => {
            warn!("DHT12 line init failed ({})", e);
            None
        }
    };

    // ── 5. Sensor context ─────────────────────────────────────
    let ports = SensorPorts {
        analog: HiGrowAnalog::new(),
        environmental,
        probe: climate,
        light,
        // Microsecond-accurate; FreeRTOS ticks would round each 2 ms
        // sample pause up to the 10 ms tick.
        delay: Delay::new_default(),
    };
    let mut sensors = SensorContext::probe(ports, &config)?;

    // ── 6. Dispatcher + schedule ──────────────────────────────
    let mut dispatcher = Dispatcher::new(default_readers());
    if let Some(act) = config.actuator {
        // SAFETY: the GPIO number comes from configuration and is not
        // claimed by any other driver in this firmware.
        let pin = PinDriver::output(unsafe { AnyOutputPin::new(act.gpio) })?;
        dispatcher.register_handler(act.channel, DigitalEcho::new(pin))?;
        info!("Actuator on GPIO{} bound to channel {}", act.gpio, act.channel);
    }

    let mut scheduler = Scheduler::new();
    for channel in Channel::ALL {
        if dispatcher.readers().contains(channel.id()) {
            scheduler.add(channel, config.report_interval_secs)?;
        }
    }
    // Spread reads (one of them a blocking salinity window) over the
    // interval instead of bunching them on one tick.
    scheduler.stagger();

    let mut sink = LogReportSink::new();
    let mut button = LongPressDetector::new(config.long_press_ms);
    let clock = MonotonicClock::new();

    // One full pass so the dashboard has values before the first interval.
    let reported = dispatcher.report_all(&mut sensors, &mut sink);
    info!("Initial report: {} channels", reported);

    // ── 7. Main loop ──────────────────────────────────────────
    let mut mark = clock.uptime_ms();
    loop {
        watchdog.feed();

        if let Some(event) = button.poll(clock.uptime_ms()) {
            dispatcher.on_button(event, &mut sink);
        }

        let mut delegate = ReportDelegate {
            dispatcher: &mut dispatcher,
            sensors: &mut sensors,
            sink: &mut sink,
        };
        scheduler.tick(clock.lap_ms(&mut mark), &mut delegate);

        FreeRtos::delay_ms(config.loop_interval_ms);
    }
}
