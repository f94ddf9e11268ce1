//! Heartbeat monitor daemon.
//!
//! Listens for heartbeat datagrams on a UDP socket, routes them into the
//! supervisor's intake cells, and drives the supervision state machine on
//! a fixed control cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nodepulse_bus::{driver, SubscriptionTable};
use nodepulse_core::{HeartbeatSupervisor, LogFaultSink, PeerConfig};
use nodepulse_monitor::{config::MonitorConfig, cycle};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // Pad the slot table out to the requested capacity; spare slots stay
    // unconfigured until something reconfigures them at runtime.
    let mut peers = config.peers.clone();
    peers.resize(config.slot_capacity, PeerConfig::unset());

    let table = Arc::new(SubscriptionTable::new(config.slot_capacity));
    let mut supervisor = match HeartbeatSupervisor::new(
        &peers,
        Box::new(Arc::clone(&table)),
        Box::new(LogFaultSink),
    ) {
        Ok(supervisor) => supervisor,
        Err(e) => {
            tracing::error!(error = %e, "Failed to configure supervision");
            std::process::exit(1);
        }
    };

    // Timeout edges already surface through the fault sink; restart
    // announcements only surface through the reset observers.
    for index in 0..supervisor.capacity() {
        supervisor
            .bind_reset_observer(
                index,
                Some(Box::new(|node_id, slot| {
                    tracing::info!(node_id, slot, "Peer announced restart");
                })),
            )
            .expect("slot index within capacity should be bindable");
    }

    let socket = match tokio::net::UdpSocket::bind(&config.bind_addr).await {
        Ok(socket) => socket,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr, "Failed to bind bus socket");
            std::process::exit(1);
        }
    };

    tracing::info!(
        addr = %config.bind_addr,
        peers = config.peers.len(),
        capacity = config.slot_capacity,
        cycle_ms = config.cycle_interval_ms,
        "Monitor starting"
    );

    let cancel = CancellationToken::new();
    let listener = tokio::spawn(driver::run(socket, Arc::clone(&table), cancel.clone()));
    let cycle_task = tokio::spawn(cycle::run(
        supervisor,
        Duration::from_millis(config.cycle_interval_ms),
        cancel.clone(),
    ));

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }

    cancel.cancel();
    let _ = listener.await;
    let _ = cycle_task.await;
    tracing::info!("Monitor stopped");
}
