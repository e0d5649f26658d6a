//! Scan trigger policies.
//!
//! Only one scan may be in flight per engine. When triggers can arrive
//! from outside the owning loop (input thread, gameplay scripts), that
//! serialization must be an explicit choice, not an accident. Two
//! policies are provided:
//!
//! - [`TriggerGate`] - single slot, drop-new-request: a trigger that
//!   arrives while one is pending is rejected
//! - [`ScanQueue`] - bounded FIFO: triggers queue up to a fixed depth and
//!   the owning loop drains at most one per frame

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use echoloc_shared::Vec3;
use tracing::debug;

/// Outcome of offering a trigger to a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerPolicy {
    /// The trigger was accepted and will run.
    Accepted,
    /// The trigger was dropped; a scan is already pending/queued.
    Rejected,
}

/// Single-slot, drop-new-request trigger gate.
///
/// Thread-safe: producers call [`TriggerGate::request`], the owning loop
/// calls [`TriggerGate::take`] once per frame and runs the scan.
#[derive(Debug, Default)]
pub struct TriggerGate {
    /// The pending scan origin, if any.
    pending: parking_lot::Mutex<Option<Vec3>>,
}

impl TriggerGate {
    /// Creates an empty gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a scan origin. Rejected if one is already pending.
    pub fn request(&self, origin: Vec3) -> TriggerPolicy {
        let mut slot = self.pending.lock();
        if slot.is_some() {
            debug!("scan trigger dropped: one already pending");
            return TriggerPolicy::Rejected;
        }
        *slot = Some(origin);
        TriggerPolicy::Accepted
    }

    /// Claims the pending origin, leaving the gate open again.
    pub fn take(&self) -> Option<Vec3> {
        self.pending.lock().take()
    }
}

/// Bounded FIFO of scan triggers.
///
/// Producers clone the [`ScanSender`]; the owning loop drains with
/// [`ScanQueue::next`]. A full queue rejects instead of blocking - a scan
/// burst must never stall the thread that feeds the renderer.
#[derive(Debug)]
pub struct ScanQueue {
    /// Producer handle kept for cloning.
    sender: Sender<Vec3>,
    /// Consumer side, owned by the loop that drives the engine.
    receiver: Receiver<Vec3>,
}

/// Cloneable producer handle onto a [`ScanQueue`].
#[derive(Clone, Debug)]
pub struct ScanSender {
    /// Channel side shared with the queue.
    sender: Sender<Vec3>,
}

impl ScanSender {
    /// Offers a scan origin. Rejected when the queue is full.
    pub fn request(&self, origin: Vec3) -> TriggerPolicy {
        match self.sender.try_send(origin) {
            Ok(()) => TriggerPolicy::Accepted,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                debug!("scan trigger dropped: queue full or closed");
                TriggerPolicy::Rejected
            }
        }
    }
}

impl ScanQueue {
    /// Creates a queue holding at most `depth` pending triggers.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    #[must_use]
    pub fn new(depth: usize) -> Self {
        assert!(depth > 0, "a zero-depth queue can never accept a trigger");
        let (sender, receiver) = bounded(depth);
        Self { sender, receiver }
    }

    /// A producer handle for other threads.
    #[must_use]
    pub fn sender(&self) -> ScanSender {
        ScanSender { sender: self.sender.clone() }
    }

    /// Takes the oldest pending trigger, if any. Never blocks.
    pub fn next(&self) -> Option<Vec3> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_drops_second_request() {
        let gate = TriggerGate::new();
        assert_eq!(gate.request(Vec3::ZERO), TriggerPolicy::Accepted);
        assert_eq!(gate.request(Vec3::X), TriggerPolicy::Rejected);

        // The accepted origin survives, the rejected one is gone
        assert_eq!(gate.take(), Some(Vec3::ZERO));
        assert_eq!(gate.take(), None);

        // Gate reopens after take
        assert_eq!(gate.request(Vec3::X), TriggerPolicy::Accepted);
    }

    #[test]
    fn test_queue_is_fifo_and_bounded() {
        let queue = ScanQueue::new(2);
        let sender = queue.sender();
        assert_eq!(sender.request(Vec3::X), TriggerPolicy::Accepted);
        assert_eq!(sender.request(Vec3::Y), TriggerPolicy::Accepted);
        assert_eq!(sender.request(Vec3::Z), TriggerPolicy::Rejected);

        assert_eq!(queue.next(), Some(Vec3::X));
        assert_eq!(queue.next(), Some(Vec3::Y));
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn test_queue_accepts_after_drain() {
        let queue = ScanQueue::new(1);
        let sender = queue.sender();
        assert_eq!(sender.request(Vec3::X), TriggerPolicy::Accepted);
        assert_eq!(sender.request(Vec3::Y), TriggerPolicy::Rejected);
        let _ = queue.next();
        assert_eq!(sender.request(Vec3::Y), TriggerPolicy::Accepted);
    }
}
