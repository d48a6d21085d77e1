//! Dispatcher, scheduler and command routing end to end.

use higrow::app::channels::Channel;
use higrow::app::commands::{ButtonEvent, CommandOutcome, DigitalEcho};
use higrow::app::dispatcher::{default_readers, Dispatcher, ReportDelegate, ReportOutcome};
use higrow::app::measurement::{Measurement, Unit};
use higrow::app::ports::AnalogPin;
use higrow::config::BridgeConfig;
use higrow::scheduler::Scheduler;

use crate::mock_hw::{MockContext, MockPin, RecordingSink, Rig};

fn dispatcher() -> Dispatcher<MockContext> {
    Dispatcher::new(default_readers())
}

#[test]
fn full_pass_reports_every_available_channel() {
    let rig = Rig::new(true, true);
    rig.analog.set(AnalogPin::Salinity, 5);
    let mut ctx = rig.build(&BridgeConfig::default());
    let mut d = dispatcher();
    let mut sink = RecordingSink::default();

    assert_eq!(d.report_all(&mut ctx, &mut sink), 9);
    let channels: Vec<u32> = sink.sent.iter().map(|m| m.channel).collect();
    assert_eq!(channels, (1..=9).collect::<Vec<u32>>());
    assert_eq!(sink.on_channel(9), vec![5.0]);
}

#[test]
fn unavailable_combo_sensor_never_reports() {
    let rig = Rig::new(false, true);
    let mut ctx = rig.build(&BridgeConfig::default());
    let mut d = dispatcher();
    let mut sink = RecordingSink::default();

    for _ in 0..4 {
        assert_eq!(
            d.report(Channel::Barometer.id(), &mut ctx, &mut sink),
            ReportOutcome::Skipped
        );
        d.report_all(&mut ctx, &mut sink);
    }
    for ch in [1, 2, 3] {
        assert!(sink.on_channel(ch).is_empty(), "channel {ch} reported");
    }
    assert_eq!(sink.on_channel(Channel::Light.id()).len(), 4);
    assert_eq!(rig.env.reads.get(), 0);
}

#[test]
fn nan_probe_skips_one_cycle_then_recovers() {
    let rig = Rig::new(true, true);
    rig.probe.humidity.borrow_mut().extend([f32::NAN, 48.0]);
    let mut ctx = rig.build(&BridgeConfig::default());
    let mut d = dispatcher();
    let mut sink = RecordingSink::default();
    let ch = Channel::ProbeHumidity.id();

    assert_eq!(d.report(ch, &mut ctx, &mut sink), ReportOutcome::Skipped);
    assert!(sink.sent.is_empty());
    assert_eq!(d.report(ch, &mut ctx, &mut sink), ReportOutcome::Reported);
    assert_eq!(sink.on_channel(ch), vec![48.0]);
}

#[test]
fn scheduler_drives_reports_at_interval() {
    let rig = Rig::new(true, false);
    let mut ctx = rig.build(&BridgeConfig::default());
    let mut d = dispatcher();
    let mut sink = RecordingSink::default();

    let mut sched = Scheduler::new();
    sched.add(Channel::Soil, 2).unwrap();
    sched.add(Channel::Battery, 1).unwrap();
    sched.add(Channel::Light, 1).unwrap();

    for _ in 0..4 {
        let mut delegate = ReportDelegate {
            dispatcher: &mut d,
            sensors: &mut ctx,
            sink: &mut sink,
        };
        sched.tick(1_000, &mut delegate);
    }

    assert_eq!(sink.on_channel(Channel::Soil.id()).len(), 2);
    assert_eq!(sink.on_channel(Channel::Battery.id()).len(), 4);
    assert!(sink.on_channel(Channel::Light.id()).is_empty());
}

#[test]
fn unknown_command_channel_has_no_effect() {
    let rig = Rig::new(true, true);
    let _ctx = rig.build(&BridgeConfig::default());
    let mut d = dispatcher();
    let mut sink = RecordingSink::default();
    let pin = MockPin::default();
    d.register_handler(11u32, DigitalEcho::new(pin.clone())).unwrap();

    assert_eq!(
        d.handle_command(999, 1.0, &mut sink),
        CommandOutcome::Unrecognized
    );
    assert!(sink.sent.is_empty());
    assert!(!pin.0.get());
}

#[test]
fn channel_one_command_is_only_logged() {
    let mut d = dispatcher();
    let mut sink = RecordingSink::default();
    assert_eq!(d.handle_command(1, 30.0, &mut sink), CommandOutcome::Logged);
    assert!(sink.sent.is_empty());
}

#[test]
fn actuator_command_drives_pin_and_echoes() {
    let mut d = dispatcher();
    let mut sink = RecordingSink::default();
    let pin = MockPin::default();
    d.register_handler(11u32, DigitalEcho::new(pin.clone())).unwrap();

    assert_eq!(d.handle_command(11, 1.0, &mut sink), CommandOutcome::Applied);
    assert!(pin.0.get());
    assert_eq!(d.handle_command(11, 0.0, &mut sink), CommandOutcome::Applied);
    assert!(!pin.0.get());
    assert_eq!(sink.on_channel(11), vec![1.0, 0.0]);
    assert!(sink.sent.iter().all(|m| m.unit == Unit::Digital));
}

#[test]
fn long_press_maps_to_proximity_channel() {
    let mut d = dispatcher();
    let mut sink = RecordingSink::default();

    d.on_button(ButtonEvent::LongPressStart, &mut sink);
    d.on_button(ButtonEvent::LongPressStop, &mut sink);

    assert_eq!(
        sink.sent,
        vec![
            Measurement::digital(Channel::Proximity, true),
            Measurement::digital(Channel::Proximity, false),
        ]
    );
}

#[test]
fn replacing_a_reader_changes_the_reported_value() {
    let rig = Rig::new(true, true);
    let mut ctx = rig.build(&BridgeConfig::default());
    let mut d = dispatcher();
    let mut sink = RecordingSink::default();

    d.readers_mut()
        .register(Channel::Soil, |_: &mut MockContext| -> Option<Measurement> {
            Some(Measurement::new(Channel::Soil, 42.0, Unit::RelativeHumidity))
        })
        .unwrap();
    d.report(Channel::Soil.id(), &mut ctx, &mut sink);
    assert_eq!(sink.on_channel(Channel::Soil.id()), vec![42.0]);
    assert_eq!(d.readers().len(), 9);
}
