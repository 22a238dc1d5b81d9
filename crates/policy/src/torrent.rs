/// Torrent lifecycle state, normalized from the client's state strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorrentState {
    Downloading,
    Seeding,
    ForcedSeeding,
    /// Seeding finished and the torrent is stopped.
    Completed,
    Stalled,
}

/// Raw torrent record as reported by the client, before inventory filtering.
#[derive(Debug, Clone)]
pub struct TorrentRecord {
    pub hash: String,
    pub name: String,
    pub size_bytes: u64,
    pub category: String,
    pub state: TorrentState,
    /// Seconds of required seeding left. Zero or negative means the seed
    /// obligation is satisfied.
    pub min_seed_time_remaining_secs: i64,
}

impl TorrentRecord {
    pub fn seed_obligation_satisfied(&self) -> bool {
        self.min_seed_time_remaining_secs <= 0
    }
}
