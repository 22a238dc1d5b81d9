use std::collections::HashMap;

use crate::average::{windowed_average, Sample};
use crate::torrent::TorrentRecord;

/// A torrent that survived category filtering, decision-ready.
#[derive(Debug, Clone)]
pub struct InventoryTorrent {
    pub record: TorrentRecord,
    /// Windowed upload average over the per-torrent horizon.
    /// `None` means no samples were available inside the window.
    pub upload_avg: Option<f64>,
}

impl InventoryTorrent {
    pub fn seed_obligation_satisfied(&self) -> bool {
        self.record.seed_obligation_satisfied()
    }
}

/// The decision-ready torrent set for one evaluation cycle.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub torrents: Vec<InventoryTorrent>,
    /// Sum of the sizes of all torrents in the filtered set.
    pub total_size_bytes: u64,
}

impl Inventory {
    /// Build the inventory from raw client records and per-torrent upload
    /// series (keyed by torrent hash).
    ///
    /// Only torrents whose category equals `category` are visible to the
    /// engine. A torrent without a series, or whose series has no sample
    /// inside the window, gets an undefined average.
    pub fn build(
        records: Vec<TorrentRecord>,
        series: &HashMap<String, Vec<Sample>>,
        horizon_secs: u64,
        now: f64,
        category: &str,
    ) -> Self {
        let mut torrents = Vec::new();
        let mut total_size_bytes = 0u64;

        for record in records {
            if record.category != category {
                continue;
            }

            let upload_avg = series
                .get(&record.hash)
                .and_then(|s| windowed_average(s, horizon_secs, now));

            total_size_bytes += record.size_bytes;
            torrents.push(InventoryTorrent { record, upload_avg });
        }

        Self {
            torrents,
            total_size_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torrent::TorrentState;

    fn record(hash: &str, category: &str, size: u64) -> TorrentRecord {
        TorrentRecord {
            hash: hash.to_string(),
            name: format!("torrent-{hash}"),
            size_bytes: size,
            category: category.to_string(),
            state: TorrentState::Seeding,
            min_seed_time_remaining_secs: 0,
        }
    }

    #[test]
    fn filters_to_configured_category_and_sums_sizes() {
        let records = vec![
            record("a", "autobrr", 100),
            record("b", "movies", 999),
            record("c", "autobrr", 200),
        ];

        let inventory = Inventory::build(records, &HashMap::new(), 300, 1000.0, "autobrr");

        assert_eq!(inventory.torrents.len(), 2);
        assert_eq!(inventory.total_size_bytes, 300);
        assert!(inventory.torrents.iter().all(|t| t.record.category == "autobrr"));
    }

    #[test]
    fn computes_per_torrent_windowed_average() {
        let records = vec![record("a", "autobrr", 100)];
        let mut series = HashMap::new();
        series.insert(
            "a".to_string(),
            vec![Sample::new(900.0, 10.0), Sample::new(950.0, 30.0)],
        );

        let inventory = Inventory::build(records, &series, 300, 1000.0, "autobrr");

        assert_eq!(inventory.torrents[0].upload_avg, Some(20.0));
    }

    #[test]
    fn missing_series_yields_undefined_average() {
        let records = vec![record("a", "autobrr", 100)];

        let inventory = Inventory::build(records, &HashMap::new(), 300, 1000.0, "autobrr");

        assert_eq!(inventory.torrents[0].upload_avg, None);
    }
}
