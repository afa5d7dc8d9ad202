//! Hardware adapters — ADC, relay, PWM, and DHT11 bindings for the three
//! peripheral roles. The only module that touches real registers.
//!
//! Digital and PWM adapters are generic over the `embedded-hal` traits, so
//! they compile (and are tested) on the host against mock pins; on target
//! they wrap `esp-idf-hal` drivers. Analog inputs read through the legacy
//! `adc1_get_raw` API (12-bit, 11 dB attenuation, matching the original
//! board calibration) and are target-only. Relays on the irrigation board
//! are active low; the grow light runs on LEDC at 5 kHz.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;

use crate::error::SensorError;
use crate::node::ports::{
    ClimateSensor, FanRelay, GrowLight, IrrigationActuators,
};

// ── Illumination node ─────────────────────────────────────────

pub struct GrowLightPwm<P> {
    pwm: P,
}

impl<P: SetDutyCycle> GrowLightPwm<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }
}

impl<P: SetDutyCycle> GrowLight for GrowLightPwm<P> {
    fn set_duty(&mut self, duty: u8) {
        // 8-bit domain duty scaled to the channel's resolution.
        if self.pwm.set_duty_cycle_fraction(u16::from(duty), 255).is_err() {
            log::warn!("grow light PWM write failed");
        }
    }
}

// ── Climate node ──────────────────────────────────────────────

/// DHT11 one-wire reader (bit-banged: start pulse, 40 data bits, checksum).
/// The probe routinely times out; that surfaces as
/// `SensorError::NotResponding` and the cycle is skipped upstream.
pub struct DhtSensor<P, D> {
    pin: P,
    delay: D,
}

impl<P: InputPin + OutputPin, D: DelayNs> DhtSensor<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    fn wait_level(&mut self, high: bool, timeout_us: u32) -> bool {
        for _ in 0..timeout_us {
            if matches!(self.pin.is_high(), Ok(level) if level == high) {
                return true;
            }
            self.delay.delay_us(1);
        }
        false
    }

    fn transaction(&mut self, data: &mut [u8; 5]) -> bool {
        // Start signal: hold low ≥18 ms, release, then sample the reply.
        let _ = self.pin.set_low();
        self.delay.delay_us(20_000);
        let _ = self.pin.set_high();
        self.delay.delay_us(40);

        // Presence pulse: ~80 µs low, ~80 µs high.
        if !self.wait_level(true, 100) || !self.wait_level(false, 100) {
            return false;
        }

        for bit in 0..40 {
            if !self.wait_level(true, 70) {
                return false;
            }
            // A high phase longer than ~30 µs encodes a 1.
            self.delay.delay_us(35);
            if matches!(self.pin.is_high(), Ok(true)) {
                data[bit / 8] |= 1 << (7 - bit % 8);
                if !self.wait_level(false, 60) {
                    return false;
                }
            }
        }
        true
    }
}

impl<P: InputPin + OutputPin, D: DelayNs> ClimateSensor for DhtSensor<P, D> {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        let mut data = [0u8; 5];
        if !self.transaction(&mut data) {
            return Err(SensorError::NotResponding);
        }
        let checksum = data[0]
            .wrapping_add(data[1])
            .wrapping_add(data[2])
            .wrapping_add(data[3]);
        if checksum != data[4] {
            return Err(SensorError::OutOfRange);
        }
        Ok(f32::from(data[2]))
    }
}

pub struct FanRelayPin<P> {
    pin: P,
}

impl<P: OutputPin> FanRelayPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> FanRelay for FanRelayPin<P> {
    fn set_fan(&mut self, on: bool) {
        let result = if on { self.pin.set_high() } else { self.pin.set_low() };
        if result.is_err() {
            log::warn!("fan relay write failed");
        }
    }
}

// ── Irrigation node ───────────────────────────────────────────

/// Watering + refill relay pair. Active low: `set_low()` energises.
pub struct IrrigationRelays<P> {
    watering: P,
    refill: P,
}

impl<P: OutputPin> IrrigationRelays<P> {
    pub fn new(mut watering: P, mut refill: P) -> Self {
        // Both pumps off at boot.
        let _ = watering.set_high();
        let _ = refill.set_high();
        Self { watering, refill }
    }
}

impl<P: OutputPin> IrrigationActuators for IrrigationRelays<P> {
    fn set_watering_pump(&mut self, on: bool) {
        let result = if on { self.watering.set_low() } else { self.watering.set_high() };
        if result.is_err() {
            log::warn!("watering relay write failed");
        }
    }

    fn set_refill_pump(&mut self, on: bool) {
        let result = if on { self.refill.set_low() } else { self.refill.set_high() };
        if result.is_err() {
            log::warn!("refill relay write failed");
        }
    }
}

// ── ADC1 analog inputs (target-only) ──────────────────────────

#[cfg(target_os = "espidf")]
mod adc {
    use esp_idf_svc::sys::{adc1_channel_t, adc1_get_raw};

    use crate::error::SensorError;
    use crate::node::ports::{IlluminationSensor, IrrigationSensors};

    /// One-time ADC1 setup: 12-bit width, 11 dB attenuation on every
    /// channel the role reads.
    pub fn init_adc1(channels: &[adc1_channel_t]) -> Result<(), SensorError> {
        use esp_idf_svc::sys::{
            adc1_config_channel_atten, adc1_config_width, adc_atten_t_ADC_ATTEN_DB_11,
            adc_bits_width_t_ADC_WIDTH_BIT_12, ESP_OK,
        };

        if unsafe { adc1_config_width(adc_bits_width_t_ADC_WIDTH_BIT_12) } != ESP_OK {
            return Err(SensorError::AdcReadFailed);
        }
        for &channel in channels {
            if unsafe { adc1_config_channel_atten(channel, adc_atten_t_ADC_ATTEN_DB_11) } != ESP_OK
            {
                return Err(SensorError::AdcReadFailed);
            }
        }
        Ok(())
    }

    fn read_adc1(channel: adc1_channel_t) -> Result<i32, SensorError> {
        let raw = unsafe { adc1_get_raw(channel) };
        if raw < 0 {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(raw)
    }

    /// LDR divider on ADC1.
    pub struct LdrSensor {
        channel: adc1_channel_t,
    }

    impl LdrSensor {
        pub fn new(channel: adc1_channel_t) -> Self {
            Self { channel }
        }
    }

    impl IlluminationSensor for LdrSensor {
        fn read_light_level(&mut self) -> Result<i32, SensorError> {
            read_adc1(self.channel)
        }
    }

    /// Soil moisture and water level probes on ADC1.
    pub struct IrrigationAdc {
        soil_channel: adc1_channel_t,
        water_channel: adc1_channel_t,
    }

    impl IrrigationAdc {
        pub fn new(soil_channel: adc1_channel_t, water_channel: adc1_channel_t) -> Self {
            Self { soil_channel, water_channel }
        }
    }

    impl IrrigationSensors for IrrigationAdc {
        fn read_soil_moisture(&mut self) -> Result<i32, SensorError> {
            read_adc1(self.soil_channel)
        }

        fn read_water_level(&mut self) -> Result<i32, SensorError> {
            read_adc1(self.water_channel)
        }
    }
}

#[cfg(target_os = "espidf")]
pub use adc::{init_adc1, IrrigationAdc, LdrSensor};
