use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use policy::{
    format_bytes, windowed_average, ActionSet, IndexerAction, Inventory, PolicyConfig,
    PolicyConfigError, PolicyEngine, Sample,
};

use crate::collaborators::{CollaboratorError, IndexerControl, MetricsSource, TorrentStore};

/// Outcome of one evaluation cycle, for logging and tests.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub actions: ActionSet,
    pub removals_applied: usize,
    pub removals_failed: usize,
    pub resumes_applied: usize,
    pub resumes_failed: usize,
    pub indexer_applied: bool,
    pub indexer_failed: bool,
    pub simulated: bool,
}

impl CycleReport {
    fn new(actions: ActionSet, simulated: bool) -> Self {
        Self {
            actions,
            removals_applied: 0,
            removals_failed: 0,
            resumes_applied: 0,
            resumes_failed: 0,
            indexer_applied: false,
            indexer_failed: false,
            simulated,
        }
    }

    pub fn summary(&self) -> String {
        let indexer = match self.actions.indexer {
            IndexerAction::Enable => "enable indexer",
            IndexerAction::Disable => "disable indexer",
            IndexerAction::NoOp => "indexer unchanged",
        };
        format!(
            "{}{}, {} removal(s) ({} failed), {} resume(s) ({} failed)",
            if self.simulated { "SIMULATION: " } else { "" },
            indexer,
            self.actions.removals.len(),
            self.removals_failed,
            self.actions.resumes.len(),
            self.resumes_failed,
        )
    }
}

/// Orchestrates one evaluation cycle: pulls inputs from the collaborators,
/// runs the pure decision step, then applies (or simulates) each action
/// independently.
///
/// This is the only component that touches mutating collaborators. A failing
/// action is logged and skipped; the rest of the cycle proceeds and the next
/// scheduled cycle self-corrects.
pub struct RunCoordinator<M, S, I> {
    engine: PolicyEngine,
    metrics: M,
    store: S,
    indexer: I,
}

impl<M, S, I> RunCoordinator<M, S, I>
where
    M: MetricsSource,
    S: TorrentStore,
    I: IndexerControl,
{
    /// Build a coordinator, rejecting malformed policy configuration up
    /// front so the engine only ever sees valid inputs.
    pub fn new(
        config: PolicyConfig,
        metrics: M,
        store: S,
        indexer: I,
    ) -> Result<Self, PolicyConfigError> {
        config.validate()?;
        Ok(Self {
            engine: PolicyEngine::new(config),
            metrics,
            store,
            indexer,
        })
    }

    /// Run one full cycle. Returns an error only when the torrent list
    /// itself cannot be fetched; every other collaborator failure degrades
    /// to conservative defaults and the cycle continues.
    pub async fn run_cycle(&self) -> Result<CycleReport, CollaboratorError> {
        let cfg = self.engine.config();
        let now = unix_now();

        let records = self.store.list_torrents(&cfg.category).await?;
        tracing::debug!("Fetched {} torrent(s) in category '{}'", records.len(), cfg.category);

        // Per-torrent upload history. A failed or empty query degrades that
        // torrent's average to undefined, which the engine treats
        // conservatively.
        let mut series: HashMap<String, Vec<Sample>> = HashMap::new();
        for record in &records {
            match self
                .metrics
                .torrent_upload_series(&record.name, cfg.torrent_horizon_secs)
                .await
            {
                Ok(samples) => {
                    series.insert(record.hash.clone(), samples);
                }
                Err(e) => {
                    tracing::warn!("No upload history for '{}': {}", record.name, e);
                }
            }
        }

        let global_avg = match self.metrics.global_upload_series(cfg.global_horizon_secs).await {
            Ok(samples) => windowed_average(&samples, cfg.global_horizon_secs, now),
            Err(e) => {
                tracing::warn!("Global upload series unavailable: {}", e);
                None
            }
        };

        let last_known = match self.indexer.current_state().await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Could not determine indexer state: {}", e);
                None
            }
        };

        let inventory = Inventory::build(
            records,
            &series,
            cfg.torrent_horizon_secs,
            now,
            &cfg.category,
        );
        tracing::debug!(
            "Inventory: {} torrent(s), total size {}",
            inventory.torrents.len(),
            format_bytes(inventory.total_size_bytes as f64),
        );

        for torrent in &inventory.torrents {
            match torrent.upload_avg {
                Some(avg) => tracing::debug!(
                    "'{}': average upload {}/s, seed time remaining {}s",
                    torrent.record.name,
                    format_bytes(avg),
                    torrent.record.min_seed_time_remaining_secs,
                ),
                None => tracing::debug!(
                    "'{}': no upload samples in window",
                    torrent.record.name
                ),
            }
        }

        // The pure decision step: deterministic, no I/O.
        let actions = self.engine.evaluate(&inventory, global_avg, last_known);

        let mut report = CycleReport::new(actions, cfg.simulate);
        self.apply(&mut report).await;
        Ok(report)
    }

    /// Apply every action independently; in simulation mode, log the
    /// intended effect without calling any mutating collaborator.
    async fn apply(&self, report: &mut CycleReport) {
        let simulate = report.simulated;
        let actions = report.actions.clone();

        for removal in &actions.removals {
            if simulate {
                tracing::info!(
                    "SIMULATION: would remove '{}' and delete its files: {}",
                    removal.name,
                    removal.reason
                );
                continue;
            }
            match self.store.remove_torrent(&removal.hash).await {
                Ok(()) => {
                    tracing::info!(
                        "Removed '{}' and deleted its files: {}",
                        removal.name,
                        removal.reason
                    );
                    report.removals_applied += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to remove '{}': {}", removal.name, e);
                    report.removals_failed += 1;
                }
            }
        }

        for resume in &actions.resumes {
            if simulate {
                tracing::info!(
                    "SIMULATION: would force-start '{}': {}",
                    resume.name,
                    resume.reason
                );
                continue;
            }
            match self.store.force_start(&resume.hash).await {
                Ok(()) => {
                    tracing::info!("Force-started '{}': {}", resume.name, resume.reason);
                    report.resumes_applied += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to force-start '{}': {}", resume.name, e);
                    report.resumes_failed += 1;
                }
            }
        }

        match actions.indexer {
            IndexerAction::NoOp => {
                tracing::debug!("Indexer unchanged: {}", actions.indexer_reason);
            }
            IndexerAction::Enable | IndexerAction::Disable => {
                let enable = actions.indexer == IndexerAction::Enable;
                let verb = if enable { "enable" } else { "disable" };
                if simulate {
                    tracing::info!(
                        "SIMULATION: would {} indexer: {}",
                        verb,
                        actions.indexer_reason
                    );
                } else {
                    match self.indexer.set_enabled(enable).await {
                        Ok(()) => {
                            tracing::info!("Indexer {}d: {}", verb, actions.indexer_reason);
                            report.indexer_applied = true;
                        }
                        Err(e) => {
                            tracing::error!("Failed to {} indexer: {}", verb, e);
                            report.indexer_failed = true;
                        }
                    }
                }
            }
        }
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
