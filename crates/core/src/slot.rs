//! Monitored-peer slot records and their liveness states.

use std::sync::Arc;

use serde::Serialize;

use crate::intake::IntakeCell;
use crate::status::PeerStatus;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Reserved node id meaning "slot not configured".
pub const NODE_ID_UNSET: u8 = 0;

/// Highest addressable node id on the 7-bit multi-drop bus.
pub const NODE_ID_MAX: u8 = 127;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Observer callback invoked with `(node_id, slot_index)` on a slot edge.
///
/// Runs synchronously on the control-cycle thread; it must not block and
/// must not call back into the supervisor. Context travels as captured
/// closure state.
pub type ObserverFn = Box<dyn FnMut(u8, usize) + Send>;

/// Liveness state of a monitored-peer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Slot holds no peer; inert.
    Unconfigured,
    /// Armed, but no genuine heartbeat consumed yet.
    Unknown,
    /// Peer is heartbeating within its timeout window.
    Active,
    /// Peer is overdue.
    Timeout,
}

/// One entry of the fixed-capacity slot table.
///
/// The intake cell is allocated once with the slot and lives for the whole
/// process; reconfiguration resets it rather than replacing it.
pub(crate) struct PeerSlot {
    pub(crate) node_id: u8,
    pub(crate) timeout_ms: u32,
    pub(crate) state: SlotState,
    pub(crate) last_status: Option<PeerStatus>,
    pub(crate) elapsed_ms: u32,
    pub(crate) intake: Arc<IntakeCell>,
    pub(crate) on_timeout: Option<ObserverFn>,
    pub(crate) on_reset: Option<ObserverFn>,
}

impl PeerSlot {
    /// A fresh, unconfigured slot with its process-lifetime intake cell.
    pub(crate) fn unconfigured() -> Self {
        Self {
            node_id: NODE_ID_UNSET,
            timeout_ms: 0,
            state: SlotState::Unconfigured,
            last_status: None,
            elapsed_ms: 0,
            intake: Arc::new(IntakeCell::new()),
            on_timeout: None,
            on_reset: None,
        }
    }

    /// Whether the slot currently monitors a peer.
    pub(crate) fn is_configured(&self) -> bool {
        self.state != SlotState::Unconfigured
    }

    pub(crate) fn snapshot(&self, index: usize) -> SlotSnapshot {
        SlotSnapshot {
            index,
            node_id: self.node_id,
            timeout_ms: self.timeout_ms,
            state: self.state,
            last_status: self.last_status,
            elapsed_ms: self.elapsed_ms,
        }
    }
}

/// Read-only view of one slot, for diagnostics and reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SlotSnapshot {
    pub index: usize,
    pub node_id: u8,
    pub timeout_ms: u32,
    pub state: SlotState,
    pub last_status: Option<PeerStatus>,
    pub elapsed_ms: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
