use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::collaborators::{IndexerControl, MetricsSource, TorrentStore};
use crate::coordinator::RunCoordinator;

/// Run evaluation cycles forever at the given interval. The first cycle
/// runs immediately.
///
/// Cycles never overlap: the cycle body runs to completion before the next
/// tick is honored, and a tick that fires while a cycle is still running is
/// skipped. Two concurrent cycles could both observe stale inventory and
/// double-issue removals against the same torrent.
pub async fn run_loop<M, S, I>(coordinator: RunCoordinator<M, S, I>, interval: Duration)
where
    M: MetricsSource,
    S: TorrentStore,
    I: IndexerControl,
{
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        timer.tick().await;

        match coordinator.run_cycle().await {
            Ok(report) => tracing::info!("Cycle complete: {}", report.summary()),
            Err(e) => tracing::error!("Cycle aborted: {}", e),
        }
    }
}
