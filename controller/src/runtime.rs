//! Tick scheduler driving the control plane.

use crate::engine::{ControlPlane, PollOutcome};
use crate::fleet::Fleet;
use crate::players::Players;
use log::{debug, info};
use std::future::Future;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Ticks between periodic session-count debug lines.
const STATUS_EVERY: u64 = 1200;

const MIN_TICK: Duration = Duration::from_millis(1);

/// Polls `engine` once per `tick` until `shutdown` resolves. A zero tick is
/// raised to one millisecond.
///
/// Missed ticks are skipped rather than bursted, so a stalled runtime does
/// not drain a backlog of datagrams in one go.
pub async fn run<F, P, S>(engine: &mut ControlPlane<F, P>, tick: Duration, shutdown: S)
where
    F: Fleet,
    P: Players,
    S: Future<Output = ()>,
{
    let mut interval_timer = interval(tick.max(MIN_TICK));
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut ticks: u64 = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down control plane");
                break;
            }
            _ = interval_timer.tick() => {
                ticks += 1;
                if let PollOutcome::Authenticated(server) = engine.poll() {
                    debug!("{} sessions after login of {}", engine.sessions().len(), server);
                }
                if ticks % STATUS_EVERY == 0 {
                    debug!("Control plane alive, {} sessions", engine.sessions().len());
                }
            }
        }
    }
}
