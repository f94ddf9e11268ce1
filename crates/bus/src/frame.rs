//! Frame model and wire form for the shared control bus.
//!
//! Frames carry an 11-bit arbitration identifier and at most eight payload
//! bytes. Heartbeats occupy one identifier per node id inside the window
//! `0x701..=0x77F`. For development and integration testing the crate also
//! defines a one-frame-per-datagram wire form: `[id_hi, id_lo, len,
//! payload...]`; bytes after the declared payload are ignored.

use nodepulse_core::NODE_ID_MAX;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Base arbitration identifier of the heartbeat window; a peer's heartbeat
/// id is `HEARTBEAT_ID_BASE + node_id`.
pub const HEARTBEAT_ID_BASE: u16 = 0x700;

/// Highest valid arbitration identifier in the 11-bit space.
pub const ID_MAX: u16 = 0x7FF;

/// Maximum payload length of one frame.
pub const MAX_PAYLOAD: usize = 8;

/// Payload length of a well-formed heartbeat frame.
pub const HEARTBEAT_PAYLOAD_LEN: usize = 1;

/// Length of the datagram header: big-endian id plus payload length.
pub const DATAGRAM_HEADER_LEN: usize = 3;

// ---------------------------------------------------------------------------
// FrameError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Arbitration id {0:#05x} outside the 11-bit space")]
    IdOutOfRange(u16),

    #[error("Payload length {0} exceeds the 8-byte frame bound")]
    PayloadTooLong(usize),

    #[error("Datagram of {0} bytes is shorter than the 3-byte header")]
    ShortDatagram(usize),

    #[error("Datagram declares {declared} payload bytes but carries {available}")]
    TruncatedPayload { declared: usize, available: usize },
}

// ---------------------------------------------------------------------------
// BusFrame
// ---------------------------------------------------------------------------

/// One frame as seen on the bus: identifier plus bounded payload.
///
/// The payload buffer is fixed; no allocation is involved in moving frames
/// around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFrame {
    id: u16,
    data: [u8; MAX_PAYLOAD],
    len: u8,
}

impl BusFrame {
    /// Build a frame from an identifier and payload slice.
    pub fn new(id: u16, payload: &[u8]) -> Result<Self, FrameError> {
        if id > ID_MAX {
            return Err(FrameError::IdOutOfRange(id));
        }
        if payload.len() > MAX_PAYLOAD {
            return Err(FrameError::PayloadTooLong(payload.len()));
        }
        let mut data = [0u8; MAX_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            data,
            len: payload.len() as u8,
        })
    }

    /// A heartbeat frame announcing `raw_status` for `node_id`.
    pub fn heartbeat(node_id: u8, raw_status: u8) -> Self {
        let mut data = [0u8; MAX_PAYLOAD];
        data[0] = raw_status;
        Self {
            id: heartbeat_id(node_id),
            data,
            len: HEARTBEAT_PAYLOAD_LEN as u8,
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

// ---------------------------------------------------------------------------
// Identifier derivation
// ---------------------------------------------------------------------------

/// Heartbeat arbitration identifier for `node_id`.
pub fn heartbeat_id(node_id: u8) -> u16 {
    HEARTBEAT_ID_BASE + u16::from(node_id)
}

/// Node id addressed by a heartbeat identifier, if it is one.
pub fn node_id_of(id: u16) -> Option<u8> {
    match id.checked_sub(HEARTBEAT_ID_BASE) {
        Some(offset) if offset >= 1 && offset <= u16::from(NODE_ID_MAX) => Some(offset as u8),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Datagram codec
// ---------------------------------------------------------------------------

/// Encode `frame` into its datagram wire form.
pub fn encode_datagram(frame: &BusFrame) -> Vec<u8> {
    let payload = frame.payload();
    let mut buf = Vec::with_capacity(DATAGRAM_HEADER_LEN + payload.len());
    buf.extend_from_slice(&frame.id.to_be_bytes());
    buf.push(payload.len() as u8);
    buf.extend_from_slice(payload);
    buf
}

/// Decode one datagram into a frame.
pub fn decode_datagram(buf: &[u8]) -> Result<BusFrame, FrameError> {
    if buf.len() < DATAGRAM_HEADER_LEN {
        return Err(FrameError::ShortDatagram(buf.len()));
    }
    let id = u16::from_be_bytes([buf[0], buf[1]]);
    let declared = buf[2] as usize;
    if declared > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLong(declared));
    }
    let available = buf.len() - DATAGRAM_HEADER_LEN;
    if available < declared {
        return Err(FrameError::TruncatedPayload {
            declared,
            available,
        });
    }
    BusFrame::new(id, &buf[DATAGRAM_HEADER_LEN..DATAGRAM_HEADER_LEN + declared])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
