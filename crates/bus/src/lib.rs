//! Bus transport for heartbeat supervision: the frame model, the receive
//! subscription table, and a reference UDP listener.
//!
//! The table implements `nodepulse_core::SubscriptionRegistry`, so a
//! `HeartbeatSupervisor` can be pointed straight at an
//! `Arc<SubscriptionTable>` while the listener dispatches into it from its
//! own task.

pub mod driver;
pub mod frame;
pub mod subscription;

pub use frame::{
    decode_datagram, encode_datagram, heartbeat_id, node_id_of, BusFrame, FrameError,
    HEARTBEAT_ID_BASE,
};
pub use subscription::SubscriptionTable;
