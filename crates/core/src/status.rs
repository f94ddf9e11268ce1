//! Peer status codes carried in heartbeat payloads.
//!
//! A heartbeat frame carries a single status byte announcing the sender's
//! operating mode. The supervisor only interprets two of them: the restart
//! announcement (`STATUS_BOOTUP`) and the fully operational mode
//! (`STATUS_OPERATIONAL`); everything else is carried through unmodified.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Status byte announcing the peer just initialized or restarted.
pub const STATUS_BOOTUP: u8 = 0x00;

/// Status byte of a peer that has halted its application layer.
pub const STATUS_STOPPED: u8 = 0x04;

/// Status byte of a fully operational peer.
pub const STATUS_OPERATIONAL: u8 = 0x05;

/// Status byte of a peer in its pre-operational configuration mode.
pub const STATUS_PRE_OPERATIONAL: u8 = 0x7F;

// ---------------------------------------------------------------------------
// PeerStatus
// ---------------------------------------------------------------------------

/// Decoded operating mode reported by a monitored peer.
///
/// Codes outside the documented set are preserved as `Other` so diagnostics
/// can surface them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerStatus {
    Bootup,
    Stopped,
    Operational,
    PreOperational,
    Other(u8),
}

impl PeerStatus {
    /// Decode a raw status byte.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            STATUS_BOOTUP => Self::Bootup,
            STATUS_STOPPED => Self::Stopped,
            STATUS_OPERATIONAL => Self::Operational,
            STATUS_PRE_OPERATIONAL => Self::PreOperational,
            other => Self::Other(other),
        }
    }

    /// The raw wire value.
    pub fn raw(&self) -> u8 {
        match self {
            Self::Bootup => STATUS_BOOTUP,
            Self::Stopped => STATUS_STOPPED,
            Self::Operational => STATUS_OPERATIONAL,
            Self::PreOperational => STATUS_PRE_OPERATIONAL,
            Self::Other(raw) => *raw,
        }
    }

    /// Whether this status is the restart announcement.
    pub fn is_bootup(&self) -> bool {
        matches!(self, Self::Bootup)
    }

    /// Whether the peer reports itself fully operational.
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Operational)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
