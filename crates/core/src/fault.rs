//! Level-triggered fault reporting toward the local diagnostics subsystem.
//!
//! A liveness fault is raised when a peer enters timeout and cleared when the
//! peer re-announces or its slot is reconfigured away. The sink is typically
//! an emergency/diagnostic message producer owned by the wider node stack;
//! the default implementation just logs.

// ---------------------------------------------------------------------------
// FaultKind / FaultSink
// ---------------------------------------------------------------------------

/// Kinds of fault the supervisor can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A monitored peer stopped heartbeating within its timeout window.
    LivenessLost,
}

/// Receiver for level-triggered fault conditions, keyed by peer node id.
///
/// `raise` is called once on the edge into a fault condition and `clear`
/// once on the edge out of it. Implementations must tolerate a `clear`
/// without a preceding `raise`.
pub trait FaultSink {
    /// A fault condition became active for `node_id`.
    fn raise(&mut self, kind: FaultKind, node_id: u8);

    /// A fault condition ceased for `node_id`.
    fn clear(&mut self, kind: FaultKind, node_id: u8);
}

// ---------------------------------------------------------------------------
// Built-in sinks
// ---------------------------------------------------------------------------

/// Sink that records fault edges in the log and nowhere else.
#[derive(Debug, Default)]
pub struct LogFaultSink;

impl FaultSink for LogFaultSink {
    fn raise(&mut self, kind: FaultKind, node_id: u8) {
        tracing::warn!(?kind, node_id, "Peer fault raised");
    }

    fn clear(&mut self, kind: FaultKind, node_id: u8) {
        tracing::info!(?kind, node_id, "Peer fault cleared");
    }
}

/// Sink that discards all fault edges.
#[derive(Debug, Default)]
pub struct NullFaultSink;

impl FaultSink for NullFaultSink {
    fn raise(&mut self, _kind: FaultKind, _node_id: u8) {}

    fn clear(&mut self, _kind: FaultKind, _node_id: u8) {}
}
