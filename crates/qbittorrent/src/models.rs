use serde::Deserialize;

/// Subset of the `/torrents/info` response the monitor consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct TorrentInfo {
    pub hash: String,
    pub name: String,
    /// Total size of the torrent's selected files, in bytes.
    pub size: i64,
    #[serde(default)]
    pub category: String,
    /// Raw qBittorrent state string, e.g. "forcedUP" or "stoppedUP".
    pub state: String,
    /// Remaining time in seconds. For seeding torrents with a seeding time
    /// limit this is the remaining required seed time; `<= 0` once
    /// satisfied.
    pub eta: i64,
}
