//! GPIO assignments per node role.
//!
//! Numbers match the deployed greenhouse wiring; only the ESP-IDF adapters
//! consume these. Analog inputs are named by ADC1 channel (the ADC mux,
//! not the GPIO matrix, routes them), with the board GPIO noted alongside.

// ── Coordinator ───────────────────────────────────────────────
/// Heartbeat LEDs blinked by the coordinator's idle loop.
pub const COORD_LED1_GPIO: i32 = 13;
pub const COORD_LED2_GPIO: i32 = 18;

// ── Illumination node ─────────────────────────────────────────
/// LDR divider: GPIO34, ADC1 channel 6.
pub const LDR_ADC1_CHANNEL: u32 = 6;
/// Grow light on LEDC PWM.
pub const GROW_LIGHT_GPIO: i32 = 13;
pub const GROW_LIGHT_PWM_HZ: u32 = 5_000;

// ── Climate node ──────────────────────────────────────────────
/// Fan relay (active high).
pub const FAN_RELAY_GPIO: i32 = 2;
/// DHT11 data line.
pub const DHT_GPIO: i32 = 4;

// ── Irrigation node ───────────────────────────────────────────
/// Soil moisture probe: GPIO34, ADC1 channel 6.
pub const SOIL_ADC1_CHANNEL: u32 = 6;
/// Water level probe: GPIO35, ADC1 channel 7.
pub const WATER_ADC1_CHANNEL: u32 = 7;
/// Relays are active low on this board.
pub const WATERING_RELAY_GPIO: i32 = 25;
pub const REFILL_RELAY_GPIO: i32 = 26;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irrigation_probes_use_distinct_adc1_channels() {
        assert_ne!(SOIL_ADC1_CHANNEL, WATER_ADC1_CHANNEL);
    }

    #[test]
    fn adc1_channels_exist_on_the_esp32() {
        // ADC1 exposes channels 0-7 (GPIO32-39).
        for channel in [LDR_ADC1_CHANNEL, SOIL_ADC1_CHANNEL, WATER_ADC1_CHANNEL] {
            assert!(channel <= 7);
        }
    }
}
