mod average;
mod bytes;
mod config;
mod engine;
mod inventory;
mod torrent;

pub use average::{windowed_average, Sample};
pub use bytes::format_bytes;
pub use config::{EnforcementMode, PolicyConfig, PolicyConfigError};
pub use engine::{ActionSet, IndexerAction, PolicyEngine, TorrentRemoval, TorrentResume};
pub use inventory::{Inventory, InventoryTorrent};
pub use torrent::{TorrentRecord, TorrentState};
