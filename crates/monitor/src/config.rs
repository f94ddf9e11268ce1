//! Daemon configuration loaded from environment variables.

use nodepulse_core::{PeerConfig, NODE_ID_MAX};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default UDP bind address of the bus listener.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:17300";

/// Default control-cycle period in milliseconds.
pub const DEFAULT_CYCLE_INTERVAL_MS: u64 = 50;

// ---------------------------------------------------------------------------
// MonitorConfig
// ---------------------------------------------------------------------------

/// Monitor daemon configuration.
///
/// `PEERS` is the only required setting; everything else carries a
/// development default.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// UDP address the bus listener binds to.
    pub bind_addr: String,
    /// Control-cycle period in milliseconds.
    pub cycle_interval_ms: u64,
    /// Peers to supervise, parsed from the `PEERS` env var.
    pub peers: Vec<PeerConfig>,
    /// Slot-table capacity. Slots beyond the configured peers stay free
    /// for runtime reconfiguration.
    pub slot_capacity: usize,
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var             | Default           |
    /// |---------------------|-------------------|
    /// | `BIND_ADDR`         | `0.0.0.0:17300`   |
    /// | `CYCLE_INTERVAL_MS` | `50`              |
    /// | `PEERS`             | required          |
    /// | `SLOT_CAPACITY`     | number of peers   |
    ///
    /// `PEERS` is a comma-separated list of `node_id:timeout_ms` pairs,
    /// e.g. `PEERS=5:1000,12:2000`.
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

        let cycle_interval_ms: u64 = std::env::var("CYCLE_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CYCLE_INTERVAL_MS);
        if cycle_interval_ms == 0 {
            return Err("CYCLE_INTERVAL_MS must be non-zero".to_string());
        }

        let raw_peers = std::env::var("PEERS")
            .map_err(|_| "PEERS must be set (e.g. PEERS=5:1000,12:2000)".to_string())?;
        let peers = parse_peer_list(&raw_peers)?;

        let slot_capacity: usize = std::env::var("SLOT_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(peers.len());
        if slot_capacity < peers.len() {
            return Err(format!(
                "SLOT_CAPACITY {slot_capacity} is smaller than the {} configured peers",
                peers.len()
            ));
        }

        Ok(Self {
            bind_addr,
            cycle_interval_ms,
            peers,
            slot_capacity,
        })
    }
}

// ---------------------------------------------------------------------------
// Peer list parsing
// ---------------------------------------------------------------------------

/// Parse a comma-separated list of `node_id:timeout_ms` pairs.
///
/// Whitespace around entries is tolerated and empty segments are skipped.
/// An empty result is an error: a monitor with nothing to watch is a
/// misconfiguration.
pub fn parse_peer_list(raw: &str) -> Result<Vec<PeerConfig>, String> {
    let mut peers = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (node, timeout) = part
            .split_once(':')
            .ok_or_else(|| format!("Peer entry '{part}' must look like node_id:timeout_ms"))?;
        let node_id: u8 = node
            .trim()
            .parse()
            .map_err(|_| format!("Peer entry '{part}' has an invalid node id"))?;
        if node_id == 0 || node_id > NODE_ID_MAX {
            return Err(format!(
                "Peer entry '{part}' node id must be in 1..={NODE_ID_MAX}"
            ));
        }
        let timeout_ms: u32 = timeout
            .trim()
            .parse()
            .map_err(|_| format!("Peer entry '{part}' has an invalid timeout"))?;
        if timeout_ms == 0 {
            return Err(format!("Peer entry '{part}' timeout must be non-zero"));
        }
        peers.push(PeerConfig::new(node_id, timeout_ms));
    }
    if peers.is_empty() {
        return Err("PEERS must list at least one node_id:timeout_ms pair".to_string());
    }
    Ok(peers)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
