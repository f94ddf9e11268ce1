//! Heartbeat liveness supervision for peers on a shared control bus.
//!
//! `nodepulse-core` owns the per-peer timeout engine: a fixed slot table
//! driven by a periodic control cycle and fed asynchronously by a bus
//! reception layer through lock-free intake cells. Bus transport lives in
//! `nodepulse-bus`; daemon wiring lives in `nodepulse-monitor`.

pub mod error;
pub mod fault;
pub mod intake;
pub mod slot;
pub mod status;
pub mod supervisor;

pub use error::{ConfigError, SubscriptionError};
pub use fault::{FaultKind, FaultSink, LogFaultSink, NullFaultSink};
pub use intake::{IntakeCell, SubscriptionRegistry};
pub use slot::{ObserverFn, SlotSnapshot, SlotState, NODE_ID_MAX, NODE_ID_UNSET};
pub use status::{
    PeerStatus, STATUS_BOOTUP, STATUS_OPERATIONAL, STATUS_PRE_OPERATIONAL, STATUS_STOPPED,
};
pub use supervisor::{HeartbeatSupervisor, PeerConfig};
