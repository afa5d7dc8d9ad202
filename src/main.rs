//! Greenmesh Firmware — Main Entry Point
//!
//! One firmware image serves all four greenhouse nodes; `node_role` in the
//! embedded configuration selects which loop runs.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspNowLink     EspWifiAdapter   EspClock     LogEventSink     │
//! │  (RadioLink)    (WifiPort)       (Clock)      (EventSink)      │
//! │  LdrSensor · DhtSensor · IrrigationAdc · relays · LEDC PWM     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Domain core (pure logic)                  │    │
//! │  │  control loops · codec · aggregator · projection       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{
    AccessPointConfiguration, AuthMethod, BlockingWifi, ClientConfiguration, Configuration,
    EspWifi,
};
use log::{info, warn};

use greenmesh::adapters::espnow::EspNowLink;
use greenmesh::adapters::hardware::{
    self, DhtSensor, FanRelayPin, GrowLightPwm, IrrigationAdc, IrrigationRelays, LdrSensor,
};
use greenmesh::adapters::log_sink::LogEventSink;
use greenmesh::adapters::time::EspClock;
use greenmesh::adapters::wifi::EspWifiAdapter;
use greenmesh::config::{MeshConfig, NodeRole};
use greenmesh::coordinator::{projection, Aggregator, SharedAggregator};
use greenmesh::mesh::channel::{self, ChannelSync};
use greenmesh::mesh::link::register_peers;
use greenmesh::mesh::Role;
use greenmesh::node::climate::ClimateLoop;
use greenmesh::node::illumination::IlluminationLoop;
use greenmesh::node::irrigation::IrrigationLoop;
use greenmesh::node::ports::Clock;
use greenmesh::node::runner;
use greenmesh::pins;

/// Configuration baked in at build time. Field-site provisioning replaces
/// this file and reflashes; there is no on-device editing surface.
const CONFIG_JSON: &str = include_str!("../config.json");

fn load_config() -> MeshConfig {
    match MeshConfig::from_json(CONFIG_JSON) {
        Ok(config) => {
            info!("Config loaded ({:?})", config.node_role);
            config
        }
        Err(e) => {
            warn!("Embedded config rejected ({e}), using defaults");
            MeshConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Greenmesh v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = load_config();

    // ── 2. Wi-Fi bring-up ─────────────────────────────────────
    //
    // Peripherals run plain STA (never associated; ESP-NOW only). The
    // coordinator adds a soft AP for the dashboard side.
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let wifi_config = match config.node_role {
        NodeRole::Coordinator => Configuration::Mixed(
            ClientConfiguration {
                ssid: config.reference_ssid.clone(),
                password: config.reference_password.clone(),
                auth_method: AuthMethod::None,
                ..ClientConfiguration::default()
            },
            AccessPointConfiguration {
                ssid: config.ap_ssid.clone(),
                password: config.ap_password.clone(),
                auth_method: AuthMethod::WPA2Personal,
                channel: config.initial_channel,
                ..AccessPointConfiguration::default()
            },
        ),
        NodeRole::Peripheral(_) => Configuration::Client(ClientConfiguration {
            ssid: config.reference_ssid.clone(),
            auth_method: AuthMethod::None,
            ..ClientConfiguration::default()
        }),
    };
    esp_wifi.set_configuration(&wifi_config)?;

    let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;
    wifi.start()?;
    let mut wifi_port = EspWifiAdapter::new(wifi);

    // ── 3. Channel rendezvous ─────────────────────────────────
    match channel::synchronize(&mut wifi_port, &config.reference_ssid)? {
        ChannelSync::Synced { channel } => info!("Mesh channel: {channel}"),
        ChannelSync::NotFound => {
            warn!("Reference network absent; staying on channel {}", config.initial_channel);
        }
    }

    // ── 4. ESP-NOW link + peer registration ───────────────────
    let mut link = EspNowLink::new()?;
    match config.node_role {
        NodeRole::Coordinator => {
            register_peers(
                &mut link,
                config.peers.iter().map(|p| p.address),
                config.link_init_attempts,
            )?;
        }
        NodeRole::Peripheral(_) => {
            register_peers(&mut link, [config.coordinator], config.link_init_attempts)?;
        }
    }

    let clock = EspClock::new();
    let mut sink = LogEventSink::new();
    let coordinator_addr = config.coordinator;
    let period_ms = config.loop_period_ms;

    match config.node_role {
        NodeRole::Coordinator => info!("System ready. Entering coordinator loop."),
        NodeRole::Peripheral(role) => info!("System ready. Entering {role} loop."),
    }

    // ── 5. Role loop ──────────────────────────────────────────
    match config.node_role {
        NodeRole::Coordinator => {
            let aggregator = SharedAggregator::new(Aggregator::new(config.peer_table()?));
            let mut led1 = PinDriver::output(unsafe { AnyIOPin::new(pins::COORD_LED1_GPIO) })?;
            let mut led2 = PinDriver::output(unsafe { AnyIOPin::new(pins::COORD_LED2_GPIO) })?;
            let mut last_render: u64 = 0;
            let mut dropped_seen: u32 = 0;

            loop {
                while let Some(frame) = EspNowLink::rx_queue().pop() {
                    match aggregator.ingest(frame.sender, &frame.payload, clock.now_ms()) {
                        Ok(role) => info!("RX    | {role} record from {}", frame.sender),
                        Err(e) => warn!("RX    | frame from {} discarded: {e:?}", frame.sender),
                    }
                }

                let dropped = EspNowLink::rx_queue().dropped();
                if dropped != dropped_seen {
                    warn!("RX    | {} frame(s) dropped at the mailbox", dropped - dropped_seen);
                    dropped_seen = dropped;
                }

                let now = clock.now_ms();
                if now.saturating_sub(last_render) >= u64::from(period_ms) {
                    last_render = now;
                    for line in projection::render_status(&aggregator.snapshot()).lines() {
                        info!("{line}");
                    }
                    led1.toggle()?;
                    led2.toggle()?;
                }

                FreeRtos::delay_ms(20);
            }
        }

        NodeRole::Peripheral(Role::Illumination) => {
            hardware::init_adc1(&[pins::LDR_ADC1_CHANNEL])
                .map_err(greenmesh::Error::Sensor)?;
            let mut sensor = LdrSensor::new(pins::LDR_ADC1_CHANNEL);

            let timer = LedcTimerDriver::new(
                peripherals.ledc.timer0,
                &TimerConfig::default().frequency(pins::GROW_LIGHT_PWM_HZ.Hz()),
            )?;
            let mut light = GrowLightPwm::new(LedcDriver::new(
                peripherals.ledc.channel0,
                &timer,
                unsafe { AnyIOPin::new(pins::GROW_LIGHT_GPIO) },
            )?);

            let lamp = IlluminationLoop::new(config.light);
            loop {
                if let Err(e) = runner::illumination_cycle(
                    &lamp,
                    &mut sensor,
                    &mut light,
                    &mut link,
                    coordinator_addr,
                    &mut sink,
                ) {
                    warn!("illumination cycle error: {e}");
                }
                FreeRtos::delay_ms(period_ms);
            }
        }

        NodeRole::Peripheral(Role::Climate) => {
            let mut sensor = DhtSensor::new(
                PinDriver::input_output_od(unsafe { AnyIOPin::new(pins::DHT_GPIO) })?,
                Ets,
            );
            let mut fan =
                FanRelayPin::new(PinDriver::output(unsafe { AnyIOPin::new(pins::FAN_RELAY_GPIO) })?);

            let climate = ClimateLoop::new(config.fan_on_temperature_c);
            loop {
                if let Err(e) = runner::climate_cycle(
                    &climate,
                    &mut sensor,
                    &mut fan,
                    &mut link,
                    coordinator_addr,
                    &mut sink,
                ) {
                    warn!("climate cycle error: {e}");
                }
                FreeRtos::delay_ms(period_ms);
            }
        }

        NodeRole::Peripheral(Role::Irrigation) => {
            hardware::init_adc1(&[pins::SOIL_ADC1_CHANNEL, pins::WATER_ADC1_CHANNEL])
                .map_err(greenmesh::Error::Sensor)?;
            let mut sensors =
                IrrigationAdc::new(pins::SOIL_ADC1_CHANNEL, pins::WATER_ADC1_CHANNEL);
            let mut relays = IrrigationRelays::new(
                PinDriver::output(unsafe { AnyIOPin::new(pins::WATERING_RELAY_GPIO) })?,
                PinDriver::output(unsafe { AnyIOPin::new(pins::REFILL_RELAY_GPIO) })?,
            );

            let mut irrigation = IrrigationLoop::new(&config);
            loop {
                if let Err(e) = runner::irrigation_cycle(
                    &mut irrigation,
                    &clock,
                    &mut sensors,
                    &mut relays,
                    &mut link,
                    coordinator_addr,
                    &mut sink,
                ) {
                    warn!("irrigation cycle error: {e}");
                }
                FreeRtos::delay_ms(period_ms);
            }
        }
    }
}
