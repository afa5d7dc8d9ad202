//! Critical-section hand-off between the radio receive context and the main
//! loop.
//!
//! The radio invokes its receive callback at arbitrary points relative to the
//! node's main loop, including mid-mutation of shared state. Frames therefore
//! never flow directly into domain structs: the receive context pushes whole
//! [`InboundFrame`]s here under a short critical section, and the main loop
//! drains them at its own pace. Multi-field records are always observed whole.
//!
//! One producer (receive context), one consumer (main loop). Overflow drops
//! the newest frame and counts it — the peripheral resends a fresh record on
//! its next cycle anyway.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use critical_section::Mutex;
use heapless::Deque;

use crate::mesh::link::InboundFrame;

/// Queue depth. Three peripherals at 1 Hz against a far faster consumer;
/// depth 8 absorbs bursts after the consumer stalls briefly.
pub const QUEUE_DEPTH: usize = 8;

/// Fixed-depth inbound frame queue, safe to share with an ISR-like context.
pub struct FrameQueue {
    frames: Mutex<RefCell<Deque<InboundFrame, QUEUE_DEPTH>>>,
    dropped: AtomicU32,
}

impl FrameQueue {
    pub const fn new() -> Self {
        Self {
            frames: Mutex::new(RefCell::new(Deque::new())),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push from the receive context. Returns `false` (and counts the drop)
    /// when the queue is full.
    pub fn push(&self, frame: InboundFrame) -> bool {
        let accepted = critical_section::with(|cs| {
            self.frames.borrow_ref_mut(cs).push_back(frame).is_ok()
        });
        if !accepted {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        accepted
    }

    /// Drain one frame from the main loop.
    pub fn pop(&self) -> Option<InboundFrame> {
        critical_section::with(|cs| self.frames.borrow_ref_mut(cs).pop_front())
    }

    /// Frames dropped due to overflow since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}
