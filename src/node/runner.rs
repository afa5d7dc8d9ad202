//! Per-role cycle runners: ports in, telemetry out.
//!
//! One function per peripheral role, each executing a single loop cycle:
//! read sensors → tick the control loop → drive actuators → encode → send.
//! The caller owns the cadence (sleep/timer between cycles) and the loop
//! state. Transient link failures are events, not errors — the next cycle
//! retries naturally. Delivery reports from earlier sends are drained at the
//! top of every cycle.

use log::warn;

use crate::error::Result;
use crate::mesh::link::{DeliveryStatus, RadioLink, MAX_FRAME_LEN};
use crate::mesh::{PeerIdentity, Role};
use crate::node::climate::ClimateLoop;
use crate::node::events::NodeEvent;
use crate::node::illumination::IlluminationLoop;
use crate::node::irrigation::IrrigationLoop;
use crate::node::ports::{
    ClimateSensor, Clock, EventSink, FanRelay, GrowLight, IlluminationSensor, IrrigationActuators,
    IrrigationSensors,
};
use crate::telemetry::{codec, TelemetryRecord};

fn drain_delivery_reports(link: &mut impl RadioLink, sink: &mut impl EventSink) {
    while let Some(report) = link.poll_delivery() {
        if report.status == DeliveryStatus::Failed {
            warn!("delivery to {} failed", report.peer);
            sink.emit(&NodeEvent::DeliveryFailed { peer: report.peer });
        }
    }
}

fn transmit(
    record: &TelemetryRecord,
    link: &mut impl RadioLink,
    coordinator: PeerIdentity,
    sink: &mut impl EventSink,
) -> Result<()> {
    let mut buf = [0u8; MAX_FRAME_LEN];
    let len = codec::encode(record, &mut buf)?;

    match link.send(coordinator, &buf[..len]) {
        Ok(()) => sink.emit(&NodeEvent::TelemetrySent(record.role())),
        Err(error) => {
            warn!("{} send rejected: {error}", record.role());
            sink.emit(&NodeEvent::SendRejected { role: record.role(), error });
        }
    }
    Ok(())
}

/// One illumination cycle.
pub fn illumination_cycle(
    lamp: &IlluminationLoop,
    sensor: &mut impl IlluminationSensor,
    light: &mut impl GrowLight,
    link: &mut impl RadioLink,
    coordinator: PeerIdentity,
    sink: &mut impl EventSink,
) -> Result<()> {
    drain_delivery_reports(link, sink);

    let ldr = match sensor.read_light_level() {
        Ok(value) => value,
        Err(error) => {
            sink.emit(&NodeEvent::CycleSkipped { role: Role::Illumination, error });
            return Ok(());
        }
    };

    let (duty, report) = lamp.tick(ldr);
    light.set_duty(duty);
    transmit(&TelemetryRecord::Illumination(report), link, coordinator, sink)
}

/// One climate cycle. A failed temperature read skips the cycle entirely:
/// no telemetry, relay holds its last state.
pub fn climate_cycle(
    climate: &ClimateLoop,
    sensor: &mut impl ClimateSensor,
    fan: &mut impl FanRelay,
    link: &mut impl RadioLink,
    coordinator: PeerIdentity,
    sink: &mut impl EventSink,
) -> Result<()> {
    drain_delivery_reports(link, sink);

    let temperature = match sensor.read_temperature_c() {
        Ok(value) => value,
        Err(error) => {
            warn!("temperature read failed ({error}); holding fan state");
            sink.emit(&NodeEvent::CycleSkipped { role: Role::Climate, error });
            return Ok(());
        }
    };

    let (fan_on, report) = climate.tick(temperature);
    fan.set_fan(fan_on);
    transmit(&TelemetryRecord::Climate(report), link, coordinator, sink)
}

/// One irrigation cycle.
pub fn irrigation_cycle(
    irrigation: &mut IrrigationLoop,
    clock: &impl Clock,
    sensors: &mut impl IrrigationSensors,
    actuators: &mut impl IrrigationActuators,
    link: &mut impl RadioLink,
    coordinator: PeerIdentity,
    sink: &mut impl EventSink,
) -> Result<()> {
    drain_delivery_reports(link, sink);

    let (soil, water) = match (sensors.read_soil_moisture(), sensors.read_water_level()) {
        (Ok(soil), Ok(water)) => (soil, water),
        (Err(error), _) | (_, Err(error)) => {
            sink.emit(&NodeEvent::CycleSkipped { role: Role::Irrigation, error });
            return Ok(());
        }
    };

    let (commands, report) = irrigation.tick(clock.now_ms(), soil, water, sink);
    if let Some(on) = commands.watering_pump {
        actuators.set_watering_pump(on);
    }
    if let Some(on) = commands.refill_pump {
        actuators.set_refill_pump(on);
    }
    transmit(&TelemetryRecord::Irrigation(report), link, coordinator, sink)
}
