//! ESP-NOW adapter — the real [`RadioLink`].
//!
//! Wraps the ESP-NOW peer API. The receive callback runs in the Wi-Fi task
//! context, concurrent with the main loop, so it only ever pushes whole
//! frames into the static [`FrameQueue`]; the send callback likewise queues
//! [`DeliveryReport`]s for the main loop to poll. Neither callback touches
//! domain state directly.

use core::cell::RefCell;

use critical_section::Mutex;
use esp_idf_svc::espnow::{EspNow, PeerInfo, SendStatus};
use heapless::Deque;
use log::warn;

use crate::error::{Error, Result};
use crate::mesh::link::{
    DeliveryReport, DeliveryStatus, InboundFrame, LinkError, RadioLink,
};
use crate::mesh::mailbox::FrameQueue;
use crate::mesh::PeerIdentity;

/// Inbound frames shared with the receive callback.
static RX_QUEUE: FrameQueue = FrameQueue::new();

/// Delivery reports shared with the send callback.
static TX_REPORTS: Mutex<RefCell<Deque<DeliveryReport, 8>>> =
    Mutex::new(RefCell::new(Deque::new()));

pub struct EspNowLink {
    espnow: EspNow<'static>,
}

impl EspNowLink {
    /// Initialise ESP-NOW and install the receive/send callbacks.
    pub fn new() -> Result<Self> {
        let espnow = EspNow::take().map_err(|_| Error::Link(LinkError::InitFailed))?;

        espnow
            .register_recv_cb(|src_addr: &[u8], data: &[u8]| {
                let Ok(mac) = <[u8; 6]>::try_from(src_addr) else {
                    return;
                };
                match InboundFrame::from_raw(PeerIdentity::new(mac), data) {
                    Ok(frame) => {
                        if !RX_QUEUE.push(frame) {
                            warn!("inbound frame queue full; frame dropped");
                        }
                    }
                    Err(e) => warn!("oversized inbound frame dropped: {e}"),
                }
            })
            .map_err(|_| Error::Link(LinkError::InitFailed))?;

        espnow
            .register_send_cb(|dst_addr: &[u8], status: SendStatus| {
                let Ok(mac) = <[u8; 6]>::try_from(dst_addr) else {
                    return;
                };
                let report = DeliveryReport {
                    peer: PeerIdentity::new(mac),
                    status: if matches!(status, SendStatus::SUCCESS) {
                        DeliveryStatus::Delivered
                    } else {
                        DeliveryStatus::Failed
                    },
                };
                critical_section::with(|cs| {
                    let _ = TX_REPORTS.borrow_ref_mut(cs).push_back(report);
                });
            })
            .map_err(|_| Error::Link(LinkError::InitFailed))?;

        Ok(Self { espnow })
    }

    /// The static queue the receive callback fills; the coordinator's main
    /// loop drains it.
    pub fn rx_queue() -> &'static FrameQueue {
        &RX_QUEUE
    }
}

impl RadioLink for EspNowLink {
    fn register_peer(&mut self, peer: PeerIdentity) -> core::result::Result<(), LinkError> {
        let info = PeerInfo {
            peer_addr: peer.octets(),
            channel: 0, // current channel, set by the rendezvous at boot
            encrypt: false,
            ..Default::default()
        };
        self.espnow.add_peer(info).map_err(|e| {
            let code = e.code() as u32;
            if code == esp_idf_svc::sys::ESP_ERR_ESPNOW_EXIST {
                LinkError::DuplicatePeer
            } else if code == esp_idf_svc::sys::ESP_ERR_ESPNOW_FULL {
                LinkError::PeerTableFull
            } else {
                LinkError::InitFailed
            }
        })
    }

    fn send(&mut self, peer: PeerIdentity, payload: &[u8]) -> core::result::Result<(), LinkError> {
        self.espnow
            .send(peer.octets(), payload)
            .map_err(|_| LinkError::SendRejected)
    }

    fn poll_delivery(&mut self) -> Option<DeliveryReport> {
        critical_section::with(|cs| TX_REPORTS.borrow_ref_mut(cs).pop_front())
    }
}
