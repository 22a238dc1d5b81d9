use async_trait::async_trait;
use thiserror::Error;

use autobrr::AutobrrClient;
use policy::{Sample, TorrentRecord, TorrentState};
use prometheus::PrometheusClient;
use qbittorrent::{QBittorrentClient, TorrentInfo};

/// Metric exported by the qBittorrent Prometheus exporter, one series per
/// torrent (labelled by name).
const UPLOAD_SPEED_METRIC: &str = "qbittorrent_torrent_upload_speed_bytes";

/// A recoverable failure of an external API. Logged per fetch/action,
/// never aborts the cycle; the next scheduled cycle retries.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("qBittorrent: {0}")]
    QBittorrent(#[from] qbittorrent::QBittorrentError),

    #[error("Prometheus: {0}")]
    Prometheus(#[from] prometheus::PrometheusError),

    #[error("autobrr: {0}")]
    Autobrr(#[from] autobrr::AutobrrError),
}

/// Time-series query service supplying upload-rate samples.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Upload-rate samples across all torrents over the trailing horizon,
    /// ordered by timestamp.
    async fn global_upload_series(
        &self,
        horizon_secs: u64,
    ) -> Result<Vec<Sample>, CollaboratorError>;

    /// Upload-rate samples for one torrent over the trailing horizon.
    async fn torrent_upload_series(
        &self,
        torrent_name: &str,
        horizon_secs: u64,
    ) -> Result<Vec<Sample>, CollaboratorError>;
}

/// Torrent client control surface.
#[async_trait]
pub trait TorrentStore: Send + Sync {
    async fn list_torrents(&self, category: &str) -> Result<Vec<TorrentRecord>, CollaboratorError>;

    /// Remove a torrent including its downloaded files. Destructive.
    async fn remove_torrent(&self, hash: &str) -> Result<(), CollaboratorError>;

    /// Force-start a stopped torrent so it seeds again.
    async fn force_start(&self, hash: &str) -> Result<(), CollaboratorError>;
}

/// Indexer on/off switch.
#[async_trait]
pub trait IndexerControl: Send + Sync {
    /// Last-known enabled state of the targeted indexer(s). `None` when the
    /// state is mixed or cannot be determined, which forces an explicit
    /// transition instead of a no-op.
    async fn current_state(&self) -> Result<Option<bool>, CollaboratorError>;

    async fn set_enabled(&self, enabled: bool) -> Result<(), CollaboratorError>;
}

/// [`MetricsSource`] backed by Prometheus range-vector queries.
pub struct PrometheusMetrics {
    client: PrometheusClient,
}

impl PrometheusMetrics {
    pub fn new(client: PrometheusClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetricsSource for PrometheusMetrics {
    async fn global_upload_series(
        &self,
        horizon_secs: u64,
    ) -> Result<Vec<Sample>, CollaboratorError> {
        let series = self
            .client
            .query_range_vector(UPLOAD_SPEED_METRIC, horizon_secs)
            .await?;

        // Flatten every torrent's points into one series so the global
        // average weighs all observed rates equally.
        let mut samples: Vec<Sample> = series
            .into_iter()
            .flat_map(|s| s.samples)
            .map(|(ts, value)| Sample::new(ts, value))
            .collect();
        samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        Ok(samples)
    }

    async fn torrent_upload_series(
        &self,
        torrent_name: &str,
        horizon_secs: u64,
    ) -> Result<Vec<Sample>, CollaboratorError> {
        let selector = format!(
            "{}{{name=\"{}\"}}",
            UPLOAD_SPEED_METRIC,
            escape_label_value(torrent_name)
        );
        let series = self
            .client
            .query_range_vector(&selector, horizon_secs)
            .await?;

        let mut samples: Vec<Sample> = series
            .into_iter()
            .flat_map(|s| s.samples)
            .map(|(ts, value)| Sample::new(ts, value))
            .collect();
        samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        Ok(samples)
    }
}

/// Escape a string for use inside a PromQL label matcher.
fn escape_label_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// [`TorrentStore`] backed by the qBittorrent WebUI API. Re-authenticates
/// and retries once when the session cookie has expired.
pub struct QBittorrentStore {
    client: QBittorrentClient,
    username: String,
    password: String,
}

impl QBittorrentStore {
    pub fn new(client: QBittorrentClient, username: String, password: String) -> Self {
        Self {
            client,
            username,
            password,
        }
    }

    async fn ensure_login(&self) -> qbittorrent::Result<()> {
        if !self.client.is_authenticated().await {
            self.client.login(&self.username, &self.password).await?;
        }
        Ok(())
    }

    async fn relogin(&self) -> qbittorrent::Result<()> {
        tracing::debug!("qBittorrent session expired, re-authenticating");
        self.client.login(&self.username, &self.password).await
    }
}

#[async_trait]
impl TorrentStore for QBittorrentStore {
    async fn list_torrents(&self, category: &str) -> Result<Vec<TorrentRecord>, CollaboratorError> {
        self.ensure_login().await.map_err(CollaboratorError::from)?;

        let torrents = match self.client.get_torrents(Some(category)).await {
            Err(e) if e.is_auth_error() => {
                self.relogin().await.map_err(CollaboratorError::from)?;
                self.client.get_torrents(Some(category)).await
            }
            other => other,
        }
        .map_err(CollaboratorError::from)?;

        Ok(torrents.into_iter().map(to_record).collect())
    }

    async fn remove_torrent(&self, hash: &str) -> Result<(), CollaboratorError> {
        self.ensure_login().await.map_err(CollaboratorError::from)?;

        match self.client.delete_torrents(&[hash], true).await {
            Err(e) if e.is_auth_error() => {
                self.relogin().await.map_err(CollaboratorError::from)?;
                self.client.delete_torrents(&[hash], true).await
            }
            other => other,
        }
        .map_err(CollaboratorError::from)
    }

    async fn force_start(&self, hash: &str) -> Result<(), CollaboratorError> {
        self.ensure_login().await.map_err(CollaboratorError::from)?;

        match self.client.set_force_start(&[hash], true).await {
            Err(e) if e.is_auth_error() => {
                self.relogin().await.map_err(CollaboratorError::from)?;
                self.client.set_force_start(&[hash], true).await
            }
            other => other,
        }
        .map_err(CollaboratorError::from)
    }
}

/// Normalize a raw qBittorrent record into the engine's shape.
fn to_record(info: TorrentInfo) -> TorrentRecord {
    TorrentRecord {
        state: map_state(&info.state),
        hash: info.hash,
        name: info.name,
        size_bytes: info.size.max(0) as u64,
        category: info.category,
        min_seed_time_remaining_secs: info.eta,
    }
}

fn map_state(state: &str) -> TorrentState {
    match state {
        "forcedUP" => TorrentState::ForcedSeeding,
        "uploading" | "queuedUP" | "checkingUP" => TorrentState::Seeding,
        // qBittorrent 5.x renamed pausedUP to stoppedUP.
        "stoppedUP" | "pausedUP" => TorrentState::Completed,
        "stalledUP" | "stalledDL" => TorrentState::Stalled,
        _ => TorrentState::Downloading,
    }
}

/// [`IndexerControl`] backed by the autobrr API. Targets the configured
/// indexer by name, or every indexer when the name is "all".
pub struct AutobrrControl {
    client: AutobrrClient,
    indexer_name: String,
}

impl AutobrrControl {
    pub fn new(client: AutobrrClient, indexer_name: String) -> Self {
        Self {
            client,
            indexer_name,
        }
    }

    fn targets_all(&self) -> bool {
        self.indexer_name.eq_ignore_ascii_case("all")
    }

    fn targeted<'a>(&self, indexers: &'a [autobrr::Indexer]) -> Vec<&'a autobrr::Indexer> {
        indexers
            .iter()
            .filter(|i| self.targets_all() || i.name == self.indexer_name)
            .collect()
    }
}

#[async_trait]
impl IndexerControl for AutobrrControl {
    async fn current_state(&self) -> Result<Option<bool>, CollaboratorError> {
        let indexers = self.client.list_indexers().await?;
        let targeted = self.targeted(&indexers);

        if targeted.is_empty() {
            return Err(autobrr::AutobrrError::UnknownIndexer(self.indexer_name.clone()).into());
        }

        if targeted.iter().all(|i| i.enabled) {
            Ok(Some(true))
        } else if targeted.iter().all(|i| !i.enabled) {
            Ok(Some(false))
        } else {
            // Mixed state across targeted indexers.
            Ok(None)
        }
    }

    async fn set_enabled(&self, enabled: bool) -> Result<(), CollaboratorError> {
        let indexers = self.client.list_indexers().await?;
        let targeted = self.targeted(&indexers);

        if targeted.is_empty() {
            return Err(autobrr::AutobrrError::UnknownIndexer(self.indexer_name.clone()).into());
        }

        for indexer in targeted {
            if indexer.enabled == enabled {
                continue;
            }
            self.client.set_indexer_enabled(indexer.id, enabled).await?;
            tracing::info!(
                "Indexer '{}' (ID: {}) {}",
                indexer.name,
                indexer.id,
                if enabled { "enabled" } else { "disabled" }
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_qbittorrent_states() {
        assert_eq!(map_state("forcedUP"), TorrentState::ForcedSeeding);
        assert_eq!(map_state("uploading"), TorrentState::Seeding);
        assert_eq!(map_state("stoppedUP"), TorrentState::Completed);
        assert_eq!(map_state("pausedUP"), TorrentState::Completed);
        assert_eq!(map_state("stalledUP"), TorrentState::Stalled);
        assert_eq!(map_state("downloading"), TorrentState::Downloading);
        assert_eq!(map_state("metaDL"), TorrentState::Downloading);
    }

    #[test]
    fn escapes_promql_label_values() {
        assert_eq!(escape_label_value("plain"), "plain");
        assert_eq!(
            escape_label_value(r#"weird "name" \ here"#),
            r#"weird \"name\" \\ here"#
        );
    }
}
