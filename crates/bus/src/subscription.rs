//! Receive-subscription table: the frame intake binding for heartbeats.
//!
//! The table is shared between the control-cycle side, which (re)binds slots
//! through the `SubscriptionRegistry` trait, and the reception context,
//! which routes inbound frames with [`SubscriptionTable::dispatch`]. Both
//! sides take the internal lock for a handful of loads and stores only; the
//! reception path never allocates.

use std::sync::Arc;

use parking_lot::RwLock;

use nodepulse_core::{IntakeCell, SubscriptionError, SubscriptionRegistry};

use crate::frame::{heartbeat_id, BusFrame, HEARTBEAT_PAYLOAD_LEN};

// ---------------------------------------------------------------------------
// SubscriptionTable
// ---------------------------------------------------------------------------

struct Subscription {
    frame_id: u16,
    cell: Arc<IntakeCell>,
}

/// Fixed-capacity table of heartbeat receive subscriptions.
///
/// Sized once; binding and releasing repoints entries in place.
pub struct SubscriptionTable {
    entries: RwLock<Box<[Option<Subscription>]>>,
}

impl SubscriptionTable {
    /// A table with `capacity` slots, all empty.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new((0..capacity).map(|_| None).collect()),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.read().len()
    }

    /// Number of live subscriptions.
    pub fn bound(&self) -> usize {
        self.entries.read().iter().flatten().count()
    }

    /// Reception side: route one inbound frame.
    ///
    /// Returns true when a subscription consumed the frame. Heartbeat frames
    /// with an unexpected payload length are dropped silently, per the
    /// intake contract.
    pub fn dispatch(&self, frame: &BusFrame) -> bool {
        let entries = self.entries.read();
        let Some(sub) = entries.iter().flatten().find(|s| s.frame_id == frame.id()) else {
            return false;
        };
        if frame.payload().len() != HEARTBEAT_PAYLOAD_LEN {
            tracing::trace!(
                id = frame.id(),
                len = frame.payload().len(),
                "Dropping heartbeat frame with unexpected payload length"
            );
            return false;
        }
        sub.cell.publish(frame.payload()[0]);
        true
    }

    fn bind_slot(
        &self,
        slot: usize,
        node_id: u8,
        cell: Arc<IntakeCell>,
    ) -> Result<(), SubscriptionError> {
        let mut entries = self.entries.write();
        let capacity = entries.len();
        let entry = entries
            .get_mut(slot)
            .ok_or(SubscriptionError::SlotOutOfRange {
                index: slot,
                capacity,
            })?;
        *entry = Some(Subscription {
            frame_id: heartbeat_id(node_id),
            cell,
        });
        Ok(())
    }

    fn release_slot(&self, slot: usize) {
        if let Some(entry) = self.entries.write().get_mut(slot) {
            *entry = None;
        }
    }
}

/// The supervisor side holds the table behind an `Arc` and configures it
/// through the registry trait while the reception task keeps dispatching.
impl SubscriptionRegistry for &SubscriptionTable {
    fn bind(
        &mut self,
        slot: usize,
        node_id: u8,
        cell: Arc<IntakeCell>,
    ) -> Result<(), SubscriptionError> {
        self.bind_slot(slot, node_id, cell)
    }

    fn release(&mut self, slot: usize) {
        self.release_slot(slot);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
