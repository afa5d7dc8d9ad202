//! End-to-end mesh flows: peripheral cycle → radio frame → coordinator
//! aggregation → dashboard projection, all through the mock link.

use greenmesh::config::MeshConfig;
use greenmesh::coordinator::{projection, Aggregator, Freshness};
use greenmesh::mesh::link::{MockLink, RadioLink};
use greenmesh::mesh::Role;
use greenmesh::node::climate::ClimateLoop;
use greenmesh::node::illumination::IlluminationLoop;
use greenmesh::node::irrigation::IrrigationLoop;
use greenmesh::node::ports::Clock;
use greenmesh::node::runner;
use greenmesh::telemetry::{LightStatus, TelemetryRecord};
use greenmesh::SensorError;

use crate::mock_hw::{ActuatorCall, CollectingSink, MockHardware, StepClock};

fn linked(config: &MeshConfig) -> MockLink {
    let mut link = MockLink::new();
    link.register_peer(config.coordinator).unwrap();
    link
}

/// Drain every frame the mock link captured into the aggregator, stamping
/// them with `now_ms`, as the coordinator's receive loop would.
fn deliver(link: &mut MockLink, aggregator: &mut Aggregator, config: &MeshConfig, role: Role, now_ms: u64) {
    let sender = config.peer_address(role).unwrap();
    for (dest, payload) in link.sent.drain(..) {
        assert_eq!(dest, config.coordinator);
        aggregator.ingest(sender, &payload, now_ms).unwrap();
    }
}

#[test]
fn illumination_report_reaches_dashboard() {
    let config = MeshConfig::default();
    let mut link = linked(&config);
    let mut aggregator = Aggregator::new(config.peer_table().unwrap());
    let mut sink = CollectingSink::default();

    let mut hw = MockHardware::new();
    hw.ldr = Ok(1200);
    let lamp = IlluminationLoop::new(config.light);

    let mut actuator = MockHardware::new();
    runner::illumination_cycle(&lamp, &mut hw, &mut actuator, &mut link, config.coordinator, &mut sink)
        .unwrap();

    assert_eq!(actuator.last_call(), Some(&ActuatorCall::SetDuty(config.light.duty_full)));
    deliver(&mut link, &mut aggregator, &config, Role::Illumination, 0);

    let snapshot = aggregator.snapshot();
    let slot = snapshot.illumination.expect("slot filled");
    assert_eq!(slot.report.light_status, LightStatus::FullOn);
    assert_eq!(slot.report.ldr_value, 1200);

    let line = projection::render_status(&snapshot);
    assert!(line.starts_with("Slave1_Light_Status: ON"), "{line}");
}

#[test]
fn climate_over_threshold_turns_fan_on_everywhere() {
    let config = MeshConfig::default();
    let mut link = linked(&config);
    let mut aggregator = Aggregator::new(config.peer_table().unwrap());
    let mut sink = CollectingSink::default();

    let mut sensor = MockHardware::new();
    sensor.temperature_c = Ok(35.5);
    let mut fan = MockHardware::new();
    let climate = ClimateLoop::new(config.fan_on_temperature_c);

    runner::climate_cycle(&climate, &mut sensor, &mut fan, &mut link, config.coordinator, &mut sink)
        .unwrap();

    assert_eq!(fan.last_call(), Some(&ActuatorCall::SetFan(true)));
    deliver(&mut link, &mut aggregator, &config, Role::Climate, 0);

    let line = projection::render_status(&aggregator.snapshot());
    assert!(line.contains("Slave2_Temperature: 35.50"), "{line}");
    assert!(line.contains("Slave2_Fan_Status: ON"), "{line}");
}

#[test]
fn irrigation_watering_then_cooldown_hold() {
    let config = MeshConfig::default();
    let mut link = linked(&config);
    let mut aggregator = Aggregator::new(config.peer_table().unwrap());
    let mut sink = CollectingSink::default();

    let clock = StepClock::at(0);
    let mut sensors = MockHardware::new();
    sensors.soil = Ok(2400); // dry
    let mut pumps = MockHardware::new();
    let mut irrigation = IrrigationLoop::new(&config);

    // Cycle 1: dry soil, pulse starts.
    runner::irrigation_cycle(
        &mut irrigation, &clock, &mut sensors, &mut pumps, &mut link, config.coordinator, &mut sink,
    )
    .unwrap();
    assert!(pumps.watering_on());
    deliver(&mut link, &mut aggregator, &config, Role::Irrigation, 0);
    let line = projection::render_status(&aggregator.snapshot());
    assert!(line.contains("Soil is dry. Watering the plant..."), "{line}");

    // Cycle 2: pulse elapsed, still dry, inside the cooldown window.
    clock.set(u64::from(config.watering_pulse_ms) + 1_000);
    runner::irrigation_cycle(
        &mut irrigation, &clock, &mut sensors, &mut pumps, &mut link, config.coordinator, &mut sink,
    )
    .unwrap();
    assert!(!pumps.watering_on(), "pump must stop after the pulse duration");
    deliver(&mut link, &mut aggregator, &config, Role::Irrigation, clock.now_ms());

    let line = projection::render_status(&aggregator.snapshot());
    assert!(
        line.contains("watering is on hold until cooldown interval expires"),
        "{line}"
    );
    let remaining_secs = (config.watering_cooldown_ms - config.watering_pulse_ms - 1_000) / 1000;
    assert!(line.contains(&format!("Remaining cooldown: {remaining_secs} seconds")), "{line}");

    // Cycle 3: cooldown expired, a second pulse fires.
    clock.set(u64::from(config.watering_cooldown_ms));
    runner::irrigation_cycle(
        &mut irrigation, &clock, &mut sensors, &mut pumps, &mut link, config.coordinator, &mut sink,
    )
    .unwrap();
    assert!(pumps.watering_on());
}

#[test]
fn full_mesh_snapshot_has_no_loading_placeholders() {
    let config = MeshConfig::default();
    let mut aggregator = Aggregator::new(config.peer_table().unwrap());
    let mut sink = CollectingSink::default();
    let clock = StepClock::at(500);

    let mut link = linked(&config);
    let mut hw = MockHardware::new();
    hw.ldr = Ok(700);
    hw.temperature_c = Ok(24.0);
    hw.soil = Ok(1000);
    hw.water = Ok(1600);

    let lamp = IlluminationLoop::new(config.light);
    let climate = ClimateLoop::new(config.fan_on_temperature_c);
    let mut irrigation = IrrigationLoop::new(&config);

    let mut actuator = MockHardware::new();
    runner::illumination_cycle(&lamp, &mut hw, &mut actuator, &mut link, config.coordinator, &mut sink)
        .unwrap();
    deliver(&mut link, &mut aggregator, &config, Role::Illumination, clock.now_ms());

    runner::climate_cycle(&climate, &mut hw, &mut actuator, &mut link, config.coordinator, &mut sink)
        .unwrap();
    deliver(&mut link, &mut aggregator, &config, Role::Climate, clock.now_ms());

    runner::irrigation_cycle(
        &mut irrigation, &clock, &mut hw, &mut actuator, &mut link, config.coordinator, &mut sink,
    )
    .unwrap();
    deliver(&mut link, &mut aggregator, &config, Role::Irrigation, clock.now_ms());

    let snapshot = aggregator.snapshot();
    let line = projection::render_status(&snapshot);
    assert!(!line.contains("Loading..."), "{line}");

    for role in Role::ALL {
        assert_eq!(
            snapshot.freshness(role, clock.now_ms(), config.telemetry_ttl_ms),
            Freshness::Fresh
        );
    }
}

#[test]
fn silent_peripheral_goes_stale_but_keeps_its_data() {
    let config = MeshConfig::default();
    let mut link = linked(&config);
    let mut aggregator = Aggregator::new(config.peer_table().unwrap());
    let mut sink = CollectingSink::default();

    let mut hw = MockHardware::new();
    hw.temperature_c = Ok(21.0);
    let climate = ClimateLoop::new(config.fan_on_temperature_c);
    let mut fan = MockHardware::new();

    runner::climate_cycle(&climate, &mut hw, &mut fan, &mut link, config.coordinator, &mut sink)
        .unwrap();
    deliver(&mut link, &mut aggregator, &config, Role::Climate, 1_000);

    let snapshot = aggregator.snapshot();
    let ttl = config.telemetry_ttl_ms;
    assert_eq!(snapshot.freshness(Role::Climate, 2_000, ttl), Freshness::Fresh);
    assert_eq!(
        snapshot.freshness(Role::Climate, 1_000 + u64::from(ttl) + 1, ttl),
        Freshness::Stale
    );

    // The record itself is never dropped, only flagged.
    match snapshot.climate.map(|s| s.report) {
        Some(report) => assert!((report.temperature_c - 21.0).abs() < f32::EPSILON),
        None => panic!("stale slot must keep its last record"),
    }
}

#[test]
fn sensor_failure_sends_nothing_and_slot_stays_empty() {
    let config = MeshConfig::default();
    let mut link = linked(&config);
    let mut sink = CollectingSink::default();

    let mut hw = MockHardware::new();
    hw.temperature_c = Err(SensorError::NotResponding);
    let climate = ClimateLoop::new(config.fan_on_temperature_c);
    let mut fan = MockHardware::new();

    runner::climate_cycle(&climate, &mut hw, &mut fan, &mut link, config.coordinator, &mut sink)
        .unwrap();

    assert!(link.sent.is_empty());
    assert!(fan.calls.is_empty(), "relay holds state on a skipped cycle");

    let aggregator = Aggregator::new(config.peer_table().unwrap());
    assert!(aggregator.snapshot().climate.is_none());
}

#[test]
fn frames_decode_as_the_records_that_were_sent() {
    let config = MeshConfig::default();
    let mut link = linked(&config);
    let mut sink = CollectingSink::default();

    let mut hw = MockHardware::new();
    hw.ldr = Ok(640);
    let lamp = IlluminationLoop::new(config.light);
    let mut actuator = MockHardware::new();

    runner::illumination_cycle(&lamp, &mut hw, &mut actuator, &mut link, config.coordinator, &mut sink)
        .unwrap();

    let (_, payload) = link.last_sent().unwrap();
    let record = greenmesh::telemetry::codec::decode(Role::Illumination, payload).unwrap();
    match record {
        TelemetryRecord::Illumination(r) => {
            assert_eq!(r.ldr_value, 640);
            assert_eq!(r.light_status, LightStatus::Dim);
        }
        other => panic!("wrong variant: {other:?}"),
    }
}
