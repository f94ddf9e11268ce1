//! Reference UDP listener feeding the subscription table.
//!
//! One datagram carries one frame. Real deployments substitute their own
//! reception layer and call [`SubscriptionTable::dispatch`] from it; this
//! listener exists for development boxes, integration tests, and soak rigs.

use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

use crate::frame::{decode_datagram, DATAGRAM_HEADER_LEN, MAX_PAYLOAD};
use crate::subscription::SubscriptionTable;

/// Largest well-formed datagram: header plus a full payload.
const RECV_BUF_LEN: usize = DATAGRAM_HEADER_LEN + MAX_PAYLOAD;

/// Receive datagrams on `socket` and dispatch decoded frames until `cancel`
/// fires.
///
/// Malformed datagrams are dropped with a debug log; they never reach the
/// subscription table.
pub async fn run(socket: UdpSocket, table: Arc<SubscriptionTable>, cancel: CancellationToken) {
    let local = socket.local_addr().ok();
    tracing::info!(addr = ?local, "Bus listener started");

    let mut buf = [0u8; RECV_BUF_LEN];
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Bus listener stopping");
                break;
            }
            received = socket.recv_from(&mut buf) => {
                match received {
                    Ok((len, from)) => match decode_datagram(&buf[..len]) {
                        Ok(frame) => {
                            let routed = table.dispatch(&frame);
                            tracing::trace!(id = frame.id(), routed, "Frame received");
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, %from, len, "Dropping malformed datagram");
                        }
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "Bus socket receive failed");
                    }
                }
            }
        }
    }
}
