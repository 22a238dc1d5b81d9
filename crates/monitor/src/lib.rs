pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod scheduler;

use std::time::Duration;

use autobrr::AutobrrClient;
use prometheus::PrometheusClient;
use qbittorrent::QBittorrentClient;

use collaborators::{AutobrrControl, PrometheusMetrics, QBittorrentStore};

pub use config::{ConfigError, MonitorConfig};
pub use coordinator::{CycleReport, RunCoordinator};

/// Build the collaborators from configuration and run the monitor: a single
/// evaluation cycle when `once` is set, the periodic loop otherwise.
pub async fn run(config: MonitorConfig, once: bool) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = PrometheusMetrics::new(PrometheusClient::new(&config.prometheus_url));
    let store = QBittorrentStore::new(
        QBittorrentClient::new(&config.qbittorrent_url),
        config.qbittorrent_username.clone(),
        config.qbittorrent_password.clone(),
    );
    let indexer = AutobrrControl::new(
        AutobrrClient::new(&config.autobrr_url, &config.autobrr_api_key),
        config.indexer_name.clone(),
    );

    let interval = Duration::from_secs(config.cycle_interval_mins * 60);
    let coordinator = RunCoordinator::new(config.policy, metrics, store, indexer)?;

    if once {
        let report = coordinator.run_cycle().await?;
        tracing::info!("Cycle complete: {}", report.summary());
    } else {
        scheduler::run_loop(coordinator, interval).await;
    }

    Ok(())
}
