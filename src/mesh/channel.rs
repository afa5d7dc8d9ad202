//! Channel rendezvous against a reference infrastructure network.
//!
//! ESP-NOW style links only work when every node sits on the same Wi-Fi
//! channel. Rather than a handshake, all nodes scan for a well-known
//! reference SSID at boot and adopt its channel. Switching is done through a
//! brief promiscuous window so an active link is not disrupted mid-switch.
//!
//! ## Operational constraint
//!
//! This runs exactly once at startup and is the only coordination mechanism
//! keeping the mesh on one channel. If the reference network later moves to a
//! different channel, the nodes stay where they were until restarted — there
//! is no retry-on-mismatch while running.

use log::{info, warn};

use crate::error::Result;

/// One network found by a spectrum scan.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub ssid: heapless::String<32>,
    pub channel: u8,
}

/// Maximum number of scan results considered. Busy environments return more;
/// the reference network is expected in the strongest handful.
pub const SCAN_CAP: usize = 16;

/// Wi-Fi control surface needed for channel rendezvous.
///
/// Implemented by the ESP-IDF adapter on target and by a scripted mock in
/// host tests.
pub trait WifiPort {
    /// Perform a full spectrum scan.
    fn scan(&mut self) -> Result<heapless::Vec<ScanEntry, SCAN_CAP>>;

    /// The channel the radio currently operates on.
    fn current_channel(&mut self) -> u8;

    /// Enter or leave passive/promiscuous mode.
    fn set_promiscuous(&mut self, enabled: bool) -> Result<()>;

    /// Set the operating channel. Only valid inside a promiscuous window.
    fn set_channel(&mut self, channel: u8) -> Result<()>;
}

/// Outcome of a rendezvous attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSync {
    /// Reference network found; the node now operates on `channel`.
    Synced { channel: u8 },
    /// Reference SSID not present in the scan. Channel left unchanged.
    NotFound,
}

/// Pure lookup of a named network's channel in scan results.
pub fn find_channel(entries: &[ScanEntry], ssid: &str) -> Option<u8> {
    entries
        .iter()
        .find(|e| e.ssid.as_str() == ssid)
        .map(|e| e.channel)
}

/// Scan for `ssid` and align the local channel to it.
///
/// A missing reference network is not an error: the node keeps its current
/// channel and the caller decides whether to limp on. Scan and channel-set
/// failures propagate.
pub fn synchronize(wifi: &mut impl WifiPort, ssid: &str) -> Result<ChannelSync> {
    info!("scanning for reference network '{ssid}'");
    let entries = wifi.scan()?;

    let Some(target) = find_channel(&entries, ssid) else {
        warn!("reference network '{ssid}' not found; staying on channel {}", wifi.current_channel());
        return Ok(ChannelSync::NotFound);
    };

    if wifi.current_channel() != target {
        // Promiscuous window around the switch keeps an active link intact.
        wifi.set_promiscuous(true)?;
        wifi.set_channel(target)?;
        wifi.set_promiscuous(false)?;
    }

    info!("channel rendezvous complete: channel {target}");
    Ok(ChannelSync::Synced { channel: target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn entry(ssid: &str, channel: u8) -> ScanEntry {
        let mut s = heapless::String::new();
        let _ = s.push_str(ssid);
        ScanEntry { ssid: s, channel }
    }

    /// Records the call sequence so the promiscuous dance can be asserted.
    struct ScriptedWifi {
        results: Vec<ScanEntry>,
        channel: u8,
        fail_scan: bool,
        calls: Vec<&'static str>,
    }

    impl ScriptedWifi {
        fn new(results: Vec<ScanEntry>, channel: u8) -> Self {
            Self { results, channel, fail_scan: false, calls: Vec::new() }
        }
    }

    impl WifiPort for ScriptedWifi {
        fn scan(&mut self) -> Result<heapless::Vec<ScanEntry, SCAN_CAP>> {
            self.calls.push("scan");
            if self.fail_scan {
                return Err(Error::Init("scan failed"));
            }
            let mut out = heapless::Vec::new();
            for e in &self.results {
                let _ = out.push(e.clone());
            }
            Ok(out)
        }

        fn current_channel(&mut self) -> u8 {
            self.channel
        }

        fn set_promiscuous(&mut self, enabled: bool) -> Result<()> {
            self.calls.push(if enabled { "promisc_on" } else { "promisc_off" });
            Ok(())
        }

        fn set_channel(&mut self, channel: u8) -> Result<()> {
            self.calls.push("set_channel");
            self.channel = channel;
            Ok(())
        }
    }

    #[test]
    fn finds_channel_by_ssid() {
        let entries = [entry("neighbour", 11), entry("josip", 6)];
        assert_eq!(find_channel(&entries, "josip"), Some(6));
        assert_eq!(find_channel(&entries, "missing"), None);
    }

    #[test]
    fn switches_via_promiscuous_window() {
        let mut wifi = ScriptedWifi::new(vec![entry("josip", 6)], 1);
        let outcome = synchronize(&mut wifi, "josip").unwrap();

        assert_eq!(outcome, ChannelSync::Synced { channel: 6 });
        assert_eq!(wifi.channel, 6);
        assert_eq!(wifi.calls, ["scan", "promisc_on", "set_channel", "promisc_off"]);
    }

    #[test]
    fn already_on_channel_skips_switch() {
        let mut wifi = ScriptedWifi::new(vec![entry("josip", 1)], 1);
        let outcome = synchronize(&mut wifi, "josip").unwrap();

        assert_eq!(outcome, ChannelSync::Synced { channel: 1 });
        assert_eq!(wifi.calls, ["scan"]);
    }

    #[test]
    fn not_found_leaves_channel_unchanged() {
        let mut wifi = ScriptedWifi::new(vec![entry("neighbour", 9)], 1);
        let outcome = synchronize(&mut wifi, "josip").unwrap();

        assert_eq!(outcome, ChannelSync::NotFound);
        assert_eq!(wifi.channel, 1);
        assert_eq!(wifi.calls, ["scan"]);
    }

    #[test]
    fn scan_failure_propagates() {
        let mut wifi = ScriptedWifi::new(vec![], 1);
        wifi.fail_scan = true;
        assert_eq!(synchronize(&mut wifi, "josip"), Err(Error::Init("scan failed")));
    }
}
