//! SensorContext against mock ports: filtering, scaling and availability.

use higrow::app::channels::Channel;
use higrow::app::measurement::Unit;
use higrow::app::ports::{AnalogPin, LightMode};
use higrow::config::BridgeConfig;
use higrow::sensors::availability::SensorFamily;
use higrow::sensors::salinity::SalinityCalibration;

use crate::mock_hw::Rig;

#[test]
fn constant_salinity_window_reports_the_constant() {
    let rig = Rig::new(true, true);
    rig.analog.set(AnalogPin::Salinity, 5);
    let mut ctx = rig.build(&BridgeConfig::default());

    let m = ctx.salinity_percent().unwrap();
    assert_eq!(m.channel, Channel::Salinity.id());
    assert_eq!(m.value, 5.0);
    assert_eq!(rig.analog.reads(AnalogPin::Salinity), 120);
    assert_eq!(rig.delay.total_ms(), 240);
}

#[test]
fn ramp_window_truncates_mean() {
    let rig = Rig::new(true, true);
    rig.analog.queue(AnalogPin::Salinity, 0..120);
    let mut ctx = rig.build(&BridgeConfig::default());

    // Drops 0 and 119, sum(1..=118) / 118 = 59.5 -> 59.
    assert_eq!(ctx.salinity_percent().unwrap().value, 59.0);
}

#[test]
fn single_spike_is_rejected() {
    let rig = Rig::new(true, true);
    rig.analog.set(AnalogPin::Salinity, 100);
    rig.analog.queue(AnalogPin::Salinity, [4095]);
    let mut ctx = rig.build(&BridgeConfig::default());

    assert_eq!(ctx.salinity_percent().unwrap().value, 100.0);
}

#[test]
fn salinity_window_and_calibration_come_from_config() {
    let rig = Rig::new(true, true);
    rig.analog.set(AnalogPin::Salinity, 2000);
    let config = BridgeConfig {
        salinity_window: 10,
        salinity_calibration: SalinityCalibration::Linear {
            scale: 0.05,
            offset: -10.0,
        },
        ..BridgeConfig::default()
    };
    let mut ctx = rig.build(&config);

    let v = ctx.salinity_percent().unwrap().value;
    assert!((v - 90.0).abs() < 1e-3, "got {v}");
    assert_eq!(rig.analog.reads(AnalogPin::Salinity), 10);
}

#[test]
fn soil_scaling_is_inverted() {
    let rig = Rig::new(true, true);
    let mut ctx = rig.build(&BridgeConfig::default());

    rig.analog.set(AnalogPin::Soil, 0);
    assert_eq!(ctx.soil().unwrap().value, 100.0);
    rig.analog.set(AnalogPin::Soil, 2048);
    assert_eq!(ctx.soil().unwrap().value, 50.0);
    rig.analog.set(AnalogPin::Soil, 4095);
    let m = ctx.soil().unwrap();
    assert_eq!(m.value, 0.0);
    assert_eq!(m.unit, Unit::RelativeHumidity);
}

#[test]
fn battery_full_scale() {
    let rig = Rig::new(true, true);
    rig.analog.set(AnalogPin::Battery, 4095);
    let mut ctx = rig.build(&BridgeConfig::default());

    let m = ctx.battery().unwrap();
    assert!((m.value - 7260.0).abs() < 0.01);
    assert_eq!(m.unit, Unit::Millivolt);
}

#[test]
fn combo_sensor_values_and_units() {
    let rig = Rig::new(true, true);
    let mut ctx = rig.build(&BridgeConfig::default());

    let t = ctx.env_temperature().unwrap();
    assert_eq!((t.value, t.unit), (22.5, Unit::Celsius));
    let p = ctx.barometer().unwrap();
    assert!((p.value - 1013.25).abs() < 1e-3);
    assert_eq!(p.unit, Unit::HectoPascal);
    assert_eq!(ctx.altitude().unwrap().unit, Unit::Meter);
}

#[test]
fn altitude_uses_standard_sea_level_by_default() {
    let rig = Rig::new(true, true);
    let mut ctx = rig.build(&BridgeConfig::default());

    assert_eq!(ctx.altitude().unwrap().value, 120.0);
    assert_eq!(rig.env.sea_level_hpa.get(), Some(1013.25));
}

#[test]
fn altitude_reference_comes_from_config() {
    let rig = Rig::new(true, true);
    let config = BridgeConfig::from_json(r#"{ "sea_level_hpa": 1021.5 }"#).unwrap();
    let mut ctx = rig.build(&config);

    assert!(ctx.altitude().is_some());
    assert_eq!(rig.env.sea_level_hpa.get(), Some(1021.5));
}

#[test]
fn missed_combo_read_suppresses_one_report() {
    let rig = Rig::new(true, true);
    rig.env.temperature.borrow_mut().push_back(f32::NAN);
    let mut ctx = rig.build(&BridgeConfig::default());

    assert!(ctx.env_temperature().is_none());
    assert!(ctx.availability().is_available(SensorFamily::Environmental));
    assert_eq!(ctx.env_temperature().unwrap().value, 22.5);
}

#[test]
fn missing_sensors_are_never_read() {
    let rig = Rig::new(false, false);
    let mut ctx = rig.build(&BridgeConfig::default());

    assert!(!ctx.availability().is_available(SensorFamily::Environmental));
    assert!(!ctx.availability().is_available(SensorFamily::Light));
    for _ in 0..5 {
        assert!(ctx.env_temperature().is_none());
        assert!(ctx.barometer().is_none());
        assert!(ctx.altitude().is_none());
        assert!(ctx.light().is_none());
    }
    assert_eq!(rig.env.reads.get(), 0);
    assert_eq!(rig.light.reads.get(), 0);
}

#[test]
fn light_sensor_starts_in_continuous_high_res() {
    let rig = Rig::new(true, true);
    let mut ctx = rig.build(&BridgeConfig::default());
    assert_eq!(rig.light.mode.get(), Some(LightMode::ContinuousHighRes));
    assert_eq!(ctx.light().unwrap().value, 340.0);
}

#[test]
fn probe_failure_suppresses_only_that_read() {
    let rig = Rig::new(true, true);
    rig.probe.temperature.borrow_mut().extend([f32::NAN, 23.0]);
    let mut ctx = rig.build(&BridgeConfig::default());

    assert!(ctx.probe_temperature().is_none());
    assert_eq!(ctx.probe_temperature().unwrap().value, 23.0);
    // Humidity was never scripted to fail.
    assert_eq!(ctx.probe_humidity().unwrap().value, 21.0);
}

#[test]
fn invalid_config_fails_probe() {
    use higrow::sensors::{SensorContext, SensorPorts};

    let rig = Rig::new(true, true);
    let config = BridgeConfig {
        salinity_window: 2,
        ..BridgeConfig::default()
    };
    let ports = SensorPorts {
        analog: rig.analog.clone(),
        environmental: rig.env.clone(),
        probe: rig.probe.clone(),
        light: rig.light.clone(),
        delay: rig.delay.clone(),
    };
    assert!(SensorContext::probe(ports, &config).is_err());
}
