//! Periodic control cycle that drives the supervisor.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use nodepulse_core::HeartbeatSupervisor;

/// Run the control cycle until the token is cancelled.
///
/// Each tick feeds the supervisor the wall-clock time elapsed since the
/// previous tick, so slow cycles under load still accrue the right amount
/// of silence. Returns the supervisor on shutdown so callers can inspect
/// its final state.
pub async fn run(
    mut supervisor: HeartbeatSupervisor,
    period: Duration,
    cancel: CancellationToken,
) -> HeartbeatSupervisor {
    tracing::info!(period_ms = period.as_millis() as u64, "Control cycle started");

    let mut ticker = tokio::time::interval(period);
    let mut last = Instant::now();
    let mut healthy = supervisor.all_healthy();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Control cycle stopping");
                break;
            }
            _ = ticker.tick() => {
                let now = Instant::now();
                let elapsed_ms = now.duration_since(last).as_millis().min(u128::from(u32::MAX)) as u32;
                last = now;

                // The standalone daemon is always in a supervising mode.
                supervisor.tick(true, elapsed_ms);

                let now_healthy = supervisor.all_healthy();
                if now_healthy != healthy {
                    healthy = now_healthy;
                    if healthy {
                        tracing::info!("All supervised peers operational");
                    } else {
                        tracing::warn!("At least one supervised peer is not operational");
                    }
                }
            }
        }
    }

    supervisor
}
