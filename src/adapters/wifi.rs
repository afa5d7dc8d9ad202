//! ESP-IDF Wi-Fi adapter for channel rendezvous.
//!
//! Implements [`WifiPort`] over the ESP-IDF scan and raw channel APIs. The
//! driver must already be started in STA (peripherals) or AP+STA
//! (coordinator) mode before [`synchronize`](crate::mesh::channel::synchronize)
//! is called.

use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::debug;

use crate::error::{Error, Result};
use crate::mesh::channel::{ScanEntry, WifiPort, SCAN_CAP};

pub struct EspWifiAdapter<'d> {
    wifi: BlockingWifi<EspWifi<'d>>,
}

impl<'d> EspWifiAdapter<'d> {
    pub fn new(wifi: BlockingWifi<EspWifi<'d>>) -> Self {
        Self { wifi }
    }

    pub fn into_inner(self) -> BlockingWifi<EspWifi<'d>> {
        self.wifi
    }
}

impl WifiPort for EspWifiAdapter<'_> {
    fn scan(&mut self) -> Result<heapless::Vec<ScanEntry, SCAN_CAP>> {
        let found = self.wifi.scan().map_err(|_| Error::Init("wifi scan failed"))?;

        let mut entries = heapless::Vec::new();
        for ap in found {
            debug!("scan: '{}' on channel {}", ap.ssid, ap.channel);
            if entries
                .push(ScanEntry { ssid: ap.ssid.clone(), channel: ap.channel })
                .is_err()
            {
                break;
            }
        }
        Ok(entries)
    }

    fn current_channel(&mut self) -> u8 {
        let mut primary: u8 = 0;
        let mut second = esp_idf_svc::sys::wifi_second_chan_t_WIFI_SECOND_CHAN_NONE;
        unsafe {
            esp_idf_svc::sys::esp_wifi_get_channel(&mut primary, &mut second);
        }
        primary
    }

    fn set_promiscuous(&mut self, enabled: bool) -> Result<()> {
        esp_idf_svc::sys::esp!(unsafe {
            esp_idf_svc::sys::esp_wifi_set_promiscuous(enabled)
        })
        .map_err(|_| Error::Init("promiscuous toggle failed"))
    }

    fn set_channel(&mut self, channel: u8) -> Result<()> {
        esp_idf_svc::sys::esp!(unsafe {
            esp_idf_svc::sys::esp_wifi_set_channel(
                channel,
                esp_idf_svc::sys::wifi_second_chan_t_WIFI_SECOND_CHAN_NONE,
            )
        })
        .map_err(|_| Error::Init("channel set failed"))
    }
}
