//! Cross-context handoff between bus reception and the control cycle.
//!
//! The reception context (driver callback, interrupt, or async task) and the
//! control-cycle thread share exactly one datum per slot: a pending flag and
//! the status byte it guards. `IntakeCell` implements that handoff as an
//! atomic single-producer/single-consumer exchange; neither side takes a
//! lock, and the cycle side never blocks.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use crate::error::SubscriptionError;

// ---------------------------------------------------------------------------
// IntakeCell
// ---------------------------------------------------------------------------

/// Single-slot mailbox for the most recent heartbeat status byte.
///
/// The producer side overwrites: a burst of frames arriving between two
/// control cycles coalesces into one consumption carrying the latest status.
#[derive(Debug)]
pub struct IntakeCell {
    pending: AtomicBool,
    status: AtomicU8,
}

impl IntakeCell {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            status: AtomicU8::new(0),
        }
    }

    /// Reception side: record a decoded status byte and mark it pending.
    ///
    /// The status store is ordered before the flag store, so a consumer that
    /// observes the flag also observes the byte that set it.
    pub fn publish(&self, raw_status: u8) {
        self.status.store(raw_status, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }

    /// Cycle side: consume the pending status byte, if any.
    pub fn take(&self) -> Option<u8> {
        if self.pending.swap(false, Ordering::Acquire) {
            Some(self.status.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Discard any pending message without consuming it.
    pub fn reset(&self) {
        self.pending.store(false, Ordering::Relaxed);
    }
}

impl Default for IntakeCell {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// SubscriptionRegistry
// ---------------------------------------------------------------------------

/// Bus-side registry of heartbeat receive subscriptions.
///
/// The supervisor owns one implementation and calls it only from the
/// control-cycle side; the bus layer routes inbound frames through the
/// registered cells from its own reception context.
pub trait SubscriptionRegistry {
    /// Subscribe `slot` to heartbeats from `node_id`, delivering into `cell`.
    ///
    /// Re-points any subscription the slot already holds.
    fn bind(
        &mut self,
        slot: usize,
        node_id: u8,
        cell: Arc<IntakeCell>,
    ) -> Result<(), SubscriptionError>;

    /// Drop any subscription held by `slot`. Releasing a slot that holds
    /// none is a no-op.
    fn release(&mut self, slot: usize);
}

/// Registries whose shared references implement the trait (lock-internal
/// tables) are usable directly behind an `Arc` handle.
impl<T> SubscriptionRegistry for Arc<T>
where
    T: ?Sized,
    for<'a> &'a T: SubscriptionRegistry,
{
    fn bind(
        &mut self,
        slot: usize,
        node_id: u8,
        cell: Arc<IntakeCell>,
    ) -> Result<(), SubscriptionError> {
        let mut registry = &**self;
        registry.bind(slot, node_id, cell)
    }

    fn release(&mut self, slot: usize) {
        let mut registry = &**self;
        registry.release(slot);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
