//! Coordinator aggregation edge cases driven through real encoded frames.

use greenmesh::config::MeshConfig;
use greenmesh::coordinator::{AggregateError, Aggregator, SharedAggregator};
use greenmesh::mesh::{PeerIdentity, Role};
use greenmesh::telemetry::codec::{self, CodecError, CLIMATE_WIRE_LEN};
use greenmesh::telemetry::{ClimateReport, FanStatus, TelemetryRecord};

fn climate_frame(temperature_c: f32, fan_status: FanStatus) -> Vec<u8> {
    let record = TelemetryRecord::Climate(ClimateReport { temperature_c, fan_status });
    let mut buf = [0u8; CLIMATE_WIRE_LEN];
    let n = codec::encode(&record, &mut buf).unwrap();
    buf[..n].to_vec()
}

#[test]
fn unknown_sender_is_discarded_without_side_effects() {
    let config = MeshConfig::default();
    let mut aggregator = Aggregator::new(config.peer_table().unwrap());

    let stranger = PeerIdentity::new([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]);
    let frame = climate_frame(25.0, FanStatus::Off);

    assert_eq!(
        aggregator.ingest(stranger, &frame, 100),
        Err(AggregateError::UnknownSender(stranger))
    );
    assert_eq!(aggregator.snapshot(), Default::default());
}

#[test]
fn truncated_frame_is_a_detectable_decode_error() {
    let config = MeshConfig::default();
    let mut aggregator = Aggregator::new(config.peer_table().unwrap());
    let sender = config.peer_address(Role::Climate).unwrap();

    let mut frame = climate_frame(25.0, FanStatus::Off);
    frame.truncate(10);

    assert_eq!(
        aggregator.ingest(sender, &frame, 100),
        Err(AggregateError::Decode(CodecError::Length {
            expected: CLIMATE_WIRE_LEN,
            got: 10
        }))
    );
    assert!(aggregator.snapshot().climate.is_none());
}

#[test]
fn latest_record_overwrites_and_restamps() {
    let config = MeshConfig::default();
    let mut aggregator = Aggregator::new(config.peer_table().unwrap());
    let sender = config.peer_address(Role::Climate).unwrap();

    aggregator.ingest(sender, &climate_frame(20.0, FanStatus::Off), 1_000).unwrap();
    aggregator.ingest(sender, &climate_frame(34.0, FanStatus::On), 2_000).unwrap();

    let slot = aggregator.snapshot().climate.unwrap();
    assert!((slot.report.temperature_c - 34.0).abs() < f32::EPSILON);
    assert_eq!(slot.report.fan_status, FanStatus::On);
    assert_eq!(slot.received_at_ms, 2_000);
}

#[test]
fn bad_frame_does_not_disturb_a_good_slot() {
    let config = MeshConfig::default();
    let mut aggregator = Aggregator::new(config.peer_table().unwrap());
    let sender = config.peer_address(Role::Climate).unwrap();

    aggregator.ingest(sender, &climate_frame(28.0, FanStatus::Off), 1_000).unwrap();
    assert!(aggregator.ingest(sender, &[0u8; 5], 2_000).is_err());

    let slot = aggregator.snapshot().climate.unwrap();
    assert!((slot.report.temperature_c - 28.0).abs() < f32::EPSILON);
    assert_eq!(slot.received_at_ms, 1_000, "failed ingest must not restamp");
}

#[test]
fn shared_aggregator_serves_consistent_snapshots() {
    let config = MeshConfig::default();
    let shared = SharedAggregator::new(Aggregator::new(config.peer_table().unwrap()));
    let sender = config.peer_address(Role::Climate).unwrap();

    shared.ingest(sender, &climate_frame(30.0, FanStatus::Off), 500).unwrap();

    let snapshot = shared.snapshot();
    let slot = snapshot.climate.unwrap();
    assert!((slot.report.temperature_c - 30.0).abs() < f32::EPSILON);
    assert_eq!(slot.received_at_ms, 500);
}
