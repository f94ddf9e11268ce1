//! Per-peer heartbeat supervision: the slot table, the control-cycle state
//! machine, and the aggregate health signal.
//!
//! The supervisor owns every monitored-peer slot and is driven from exactly
//! one thread. `tick` consumes pending messages published by the reception
//! context, accrues elapsed time against each configured timeout, fires
//! observer callbacks on timeout/reset edges, and recomputes the aggregate
//! `all_healthy` flag. Configuration calls are cycle-thread-side as well;
//! the reception context only ever touches the per-slot intake cells.

use std::sync::Arc;

use crate::error::ConfigError;
use crate::fault::{FaultKind, FaultSink};
use crate::intake::SubscriptionRegistry;
use crate::slot::{ObserverFn, PeerSlot, SlotSnapshot, SlotState, NODE_ID_MAX, NODE_ID_UNSET};
use crate::status::PeerStatus;

// ---------------------------------------------------------------------------
// PeerConfig
// ---------------------------------------------------------------------------

/// Configuration for one slot of the table.
///
/// An entry with `node_id == NODE_ID_UNSET` or `timeout_ms == 0` leaves its
/// slot unconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerConfig {
    pub node_id: u8,
    pub timeout_ms: u32,
}

impl PeerConfig {
    /// Monitor `node_id` with the given timeout window.
    pub fn new(node_id: u8, timeout_ms: u32) -> Self {
        Self {
            node_id,
            timeout_ms,
        }
    }

    /// An entry that leaves its slot unconfigured.
    pub fn unset() -> Self {
        Self {
            node_id: NODE_ID_UNSET,
            timeout_ms: 0,
        }
    }

    fn arms_slot(&self) -> bool {
        self.node_id != NODE_ID_UNSET && self.timeout_ms != 0
    }
}

// ---------------------------------------------------------------------------
// HeartbeatSupervisor
// ---------------------------------------------------------------------------

/// Owner of the monitored-peer slot table.
///
/// Constructed once over a fixed number of slots; slots are reconfigured in
/// place and never reallocated, so no allocation happens after construction.
/// All methods must be called from the control-cycle side.
pub struct HeartbeatSupervisor {
    slots: Box<[PeerSlot]>,
    registry: Box<dyn SubscriptionRegistry + Send>,
    sink: Box<dyn FaultSink + Send>,
    all_healthy: bool,
}

impl std::fmt::Debug for HeartbeatSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatSupervisor")
            .field("slots", &self.slots.len())
            .field("all_healthy", &self.all_healthy)
            .finish_non_exhaustive()
    }
}

impl HeartbeatSupervisor {
    /// Build a supervisor over `peers.len()` slots.
    ///
    /// One bus subscription is established per armed entry. Fails if the
    /// table would be empty, a node id is out of the addressable range, or
    /// two non-sentinel entries name the same peer; on failure no
    /// subscription is left behind.
    pub fn new(
        peers: &[PeerConfig],
        registry: Box<dyn SubscriptionRegistry + Send>,
        sink: Box<dyn FaultSink + Send>,
    ) -> Result<Self, ConfigError> {
        if peers.is_empty() {
            return Err(ConfigError::EmptySlotTable);
        }
        for peer in peers {
            if peer.node_id > NODE_ID_MAX {
                return Err(ConfigError::InvalidNodeId(peer.node_id));
            }
        }
        for (i, peer) in peers.iter().enumerate() {
            if peer.node_id == NODE_ID_UNSET {
                continue;
            }
            if peers[..i].iter().any(|p| p.node_id == peer.node_id) {
                return Err(ConfigError::DuplicateNodeId(peer.node_id));
            }
        }

        let mut supervisor = Self {
            slots: peers.iter().map(|_| PeerSlot::unconfigured()).collect(),
            registry,
            sink,
            all_healthy: true,
        };
        for (index, peer) in peers.iter().enumerate() {
            if !peer.arms_slot() {
                continue;
            }
            if let Err(e) = supervisor.arm_slot(index, peer.node_id, peer.timeout_ms) {
                for prior in 0..index {
                    supervisor.registry.release(prior);
                }
                return Err(e);
            }
        }
        supervisor.recompute_all_healthy();

        tracing::debug!(
            capacity = supervisor.slots.len(),
            configured = supervisor.slots.iter().filter(|s| s.is_configured()).count(),
            "Heartbeat supervisor initialized"
        );
        Ok(supervisor)
    }

    /// Repurpose slot `index` at runtime.
    ///
    /// `node_id == NODE_ID_UNSET` or `timeout_ms == 0` disables the slot and
    /// releases its bus subscription; otherwise the slot is re-armed for the
    /// new peer with its timer, last status, and any pending message
    /// discarded. A pending timeout/reset edge is never signaled
    /// retroactively. Observer bindings survive reconfiguration.
    pub fn reconfigure_slot(
        &mut self,
        index: usize,
        node_id: u8,
        timeout_ms: u32,
    ) -> Result<(), ConfigError> {
        let capacity = self.slots.len();
        if index >= capacity {
            return Err(ConfigError::IndexOutOfRange { index, capacity });
        }
        if node_id > NODE_ID_MAX {
            return Err(ConfigError::InvalidNodeId(node_id));
        }
        let disabling = node_id == NODE_ID_UNSET || timeout_ms == 0;
        if !disabling {
            let duplicate = self
                .slots
                .iter()
                .enumerate()
                .any(|(i, s)| i != index && s.is_configured() && s.node_id == node_id);
            if duplicate {
                return Err(ConfigError::DuplicateNodeId(node_id));
            }
        }

        // Stop routing before touching the cell so a frame for the old peer
        // cannot land between the reset and the re-bind.
        self.registry.release(index);

        let old_id = self.slots[index].node_id;
        let was_configured = self.slots[index].is_configured();
        if self.slots[index].state == SlotState::Timeout {
            self.sink.clear(FaultKind::LivenessLost, old_id);
        }

        if disabling {
            self.disarm_slot(index);
            if was_configured {
                tracing::info!(slot = index, node_id = old_id, "Peer monitoring disabled");
            }
        } else {
            if let Err(e) = self.arm_slot(index, node_id, timeout_ms) {
                self.disarm_slot(index);
                self.recompute_all_healthy();
                return Err(e);
            }
            tracing::info!(slot = index, node_id, timeout_ms, "Peer monitoring configured");
        }
        self.recompute_all_healthy();
        Ok(())
    }

    /// Attach or clear the timeout observer for slot `index`.
    ///
    /// The observer fires once per edge into `Timeout`. Binding is allowed
    /// at any time, including while the slot is live.
    pub fn bind_timeout_observer(
        &mut self,
        index: usize,
        observer: Option<ObserverFn>,
    ) -> Result<(), ConfigError> {
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ConfigError::IndexOutOfRange { index, capacity })?;
        slot.on_timeout = observer;
        Ok(())
    }

    /// Attach or clear the reset observer for slot `index`.
    ///
    /// The observer fires once per consumed restart announcement.
    pub fn bind_reset_observer(
        &mut self,
        index: usize,
        observer: Option<ObserverFn>,
    ) -> Result<(), ConfigError> {
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ConfigError::IndexOutOfRange { index, capacity })?;
        slot.on_reset = observer;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Control cycle
    // -----------------------------------------------------------------------

    /// Advance supervision by one control cycle.
    ///
    /// `elapsed_ms` is the measured time since the previous call.
    /// `host_supervising` gates timeout accrual: while the host itself is
    /// not in a supervising mode, pending messages are still consumed but no
    /// elapsed time is charged against any peer. Never blocks.
    pub fn tick(&mut self, host_supervising: bool, elapsed_ms: u32) {
        for index in 0..self.slots.len() {
            self.tick_slot(index, host_supervising, elapsed_ms);
        }
        self.recompute_all_healthy();
    }

    /// Evaluate one slot for this cycle. Message consumption and time
    /// accrual are mutually exclusive within a cycle.
    fn tick_slot(&mut self, index: usize, host_supervising: bool, elapsed_ms: u32) {
        let slot = &mut self.slots[index];
        if !slot.is_configured() {
            return;
        }
        let node_id = slot.node_id;

        if let Some(raw) = slot.intake.take() {
            let status = PeerStatus::from_raw(raw);
            slot.last_status = Some(status);

            if status.is_bootup() {
                // A restart announcement is not proof of sustained liveness:
                // state and timer stay untouched.
                tracing::debug!(node_id, slot = index, "Peer restart announced");
                if let Some(observer) = slot.on_reset.as_mut() {
                    observer(node_id, index);
                }
                return;
            }

            slot.elapsed_ms = 0;
            match slot.state {
                SlotState::Unknown => {
                    slot.state = SlotState::Active;
                    tracing::debug!(node_id, slot = index, "Peer heartbeat acquired");
                }
                SlotState::Timeout => {
                    slot.state = SlotState::Active;
                    tracing::info!(node_id, slot = index, "Peer heartbeat recovered");
                    self.sink.clear(FaultKind::LivenessLost, node_id);
                }
                SlotState::Active | SlotState::Unconfigured => {}
            }
            return;
        }

        if !host_supervising {
            return;
        }
        if !matches!(slot.state, SlotState::Unknown | SlotState::Active) {
            return;
        }
        slot.elapsed_ms = slot.elapsed_ms.saturating_add(elapsed_ms);
        if slot.elapsed_ms >= slot.timeout_ms {
            slot.state = SlotState::Timeout;
            tracing::warn!(
                node_id,
                slot = index,
                timeout_ms = slot.timeout_ms,
                "Peer heartbeat timeout"
            );
            self.sink.raise(FaultKind::LivenessLost, node_id);
            if let Some(observer) = slot.on_timeout.as_mut() {
                observer(node_id, index);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Find the slot currently monitoring `node_id`.
    pub fn index_of(&self, node_id: u8) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.is_configured() && s.node_id == node_id)
    }

    /// Liveness state of slot `index`. An out-of-range index reads as
    /// `Unconfigured`.
    pub fn state_of(&self, index: usize) -> SlotState {
        self.slots
            .get(index)
            .map(|s| s.state)
            .unwrap_or(SlotState::Unconfigured)
    }

    /// Whether every configured slot is `Active` and reporting fully
    /// operational. Vacuously true while nothing is configured.
    pub fn all_healthy(&self) -> bool {
        self.all_healthy
    }

    /// Number of slots in the fixed table.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Snapshot of slot `index`, if in range.
    pub fn snapshot(&self, index: usize) -> Option<SlotSnapshot> {
        self.slots.get(index).map(|s| s.snapshot(index))
    }

    /// Snapshots of the whole table, in slot order.
    pub fn snapshots(&self) -> Vec<SlotSnapshot> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| s.snapshot(i))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Point `index` at a peer: reset transient state, re-point the bus
    /// subscription. The caller must have released any previous binding.
    fn arm_slot(&mut self, index: usize, node_id: u8, timeout_ms: u32) -> Result<(), ConfigError> {
        let slot = &mut self.slots[index];
        slot.node_id = node_id;
        slot.timeout_ms = timeout_ms;
        slot.state = SlotState::Unknown;
        slot.last_status = None;
        slot.elapsed_ms = 0;
        slot.intake.reset();
        let cell = Arc::clone(&slot.intake);
        self.registry.bind(index, node_id, cell)?;
        Ok(())
    }

    /// Return `index` to the inert state. The intake cell is kept (and
    /// cleared) for later re-arming.
    fn disarm_slot(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.node_id = NODE_ID_UNSET;
        slot.timeout_ms = 0;
        slot.state = SlotState::Unconfigured;
        slot.last_status = None;
        slot.elapsed_ms = 0;
        slot.intake.reset();
    }

    fn recompute_all_healthy(&mut self) {
        let healthy = self.slots.iter().filter(|s| s.is_configured()).all(|s| {
            s.state == SlotState::Active && s.last_status.is_some_and(|st| st.is_operational())
        });
        if healthy != self.all_healthy {
            tracing::debug!(healthy, "Aggregate peer health changed");
        }
        self.all_healthy = healthy;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
