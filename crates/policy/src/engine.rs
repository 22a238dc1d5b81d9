use crate::bytes::format_bytes;
use crate::config::{EnforcementMode, PolicyConfig};
use crate::inventory::Inventory;
use crate::torrent::TorrentState;

/// Desired transition for the indexer this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexerAction {
    Enable,
    Disable,
    /// Desired state matches the last-known external state; no API call.
    NoOp,
}

/// A torrent flagged for removal, including its underlying files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentRemoval {
    pub hash: String,
    pub name: String,
    pub reason: String,
}

/// A stopped torrent that should be force-started again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentResume {
    pub hash: String,
    pub name: String,
    pub reason: String,
}

/// The engine's output for one cycle, derived from a single snapshot of
/// inventory and averages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSet {
    pub indexer: IndexerAction,
    pub indexer_reason: String,
    pub removals: Vec<TorrentRemoval>,
    pub resumes: Vec<TorrentResume>,
}

/// The decision core: a pure function from (config, inventory, global
/// average, last-known indexer state) to an [`ActionSet`].
///
/// Rules are evaluated in order:
/// 1. Aggregate size gate: over budget forces the indexer off; in strict
///    mode it also removes every torrent whose seed obligation is satisfied.
/// 2. Per-torrent throughput gate: a torrent with a satisfied seed
///    obligation and a defined average below the threshold is removed.
/// 3. Global throughput gate (only when rule 1 did not force off): a global
///    average below the threshold, or an undefined one, enables the indexer.
///
/// Missing data always degrades to the conservative side: an undefined
/// per-torrent average never removes, an undefined global average enables
/// acquisition so the system can bootstrap.
pub struct PolicyEngine {
    config: PolicyConfig,
}

impl PolicyEngine {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Evaluate one cycle. `last_known_enabled` is the indexer state as last
    /// observed externally; `None` (state unknown) always emits an explicit
    /// transition instead of a no-op.
    pub fn evaluate(
        &self,
        inventory: &Inventory,
        global_avg: Option<f64>,
        last_known_enabled: Option<bool>,
    ) -> ActionSet {
        let cfg = &self.config;
        let over_budget = inventory.total_size_bytes >= cfg.max_total_size_bytes;

        let mut removals: Vec<TorrentRemoval> = Vec::new();

        // Rule 1: aggregate size gate. Strict mode removes every torrent
        // whose seed obligation is satisfied, regardless of its throughput.
        if over_budget && cfg.enforcement == EnforcementMode::Strict {
            for torrent in &inventory.torrents {
                if torrent.seed_obligation_satisfied() {
                    removals.push(TorrentRemoval {
                        hash: torrent.record.hash.clone(),
                        name: torrent.record.name.clone(),
                        reason: format!(
                            "total size {} >= budget {} (strict enforcement)",
                            format_bytes(inventory.total_size_bytes as f64),
                            format_bytes(cfg.max_total_size_bytes as f64),
                        ),
                    });
                }
            }
        }

        // Rule 2: per-torrent throughput gate, independent of rule 1.
        // Removal requires positive evidence: an undefined average never
        // removes. A torrent already flagged by the size gate keeps that
        // reason.
        let mut resumes: Vec<TorrentResume> = Vec::new();
        for torrent in &inventory.torrents {
            let Some(avg) = torrent.upload_avg else {
                continue;
            };

            if torrent.seed_obligation_satisfied()
                && avg < cfg.torrent_threshold_bytes as f64
            {
                if !removals.iter().any(|r| r.hash == torrent.record.hash) {
                    removals.push(TorrentRemoval {
                        hash: torrent.record.hash.clone(),
                        name: torrent.record.name.clone(),
                        reason: format!(
                            "average upload {}/s < threshold {}/s",
                            format_bytes(avg),
                            format_bytes(cfg.torrent_threshold_bytes as f64),
                        ),
                    });
                }
            } else if torrent.record.state == TorrentState::Completed
                && avg >= cfg.torrent_threshold_bytes as f64
                && !removals.iter().any(|r| r.hash == torrent.record.hash)
            {
                // A stopped torrent that still performs gets seeded again.
                resumes.push(TorrentResume {
                    hash: torrent.record.hash.clone(),
                    name: torrent.record.name.clone(),
                    reason: format!(
                        "stopped but average upload {}/s >= threshold {}/s",
                        format_bytes(avg),
                        format_bytes(cfg.torrent_threshold_bytes as f64),
                    ),
                });
            }
        }

        // Rule 3: global throughput gate, unless rule 1 already forced the
        // indexer off. Low or unproven aggregate throughput signals spare
        // capacity to acquire more.
        let (desired_enabled, indexer_reason) = if over_budget {
            (
                false,
                format!(
                    "total size {} >= max allocated {}",
                    format_bytes(inventory.total_size_bytes as f64),
                    format_bytes(cfg.max_total_size_bytes as f64),
                ),
            )
        } else {
            match global_avg {
                Some(avg) if avg >= cfg.global_threshold_bytes as f64 => (
                    false,
                    format!(
                        "global average upload {}/s >= threshold {}/s",
                        format_bytes(avg),
                        format_bytes(cfg.global_threshold_bytes as f64),
                    ),
                ),
                Some(avg) => (
                    true,
                    format!(
                        "global average upload {}/s < threshold {}/s",
                        format_bytes(avg),
                        format_bytes(cfg.global_threshold_bytes as f64),
                    ),
                ),
                None => (
                    true,
                    "no global upload samples in window, enabling to bootstrap".to_string(),
                ),
            }
        };

        let indexer = match last_known_enabled {
            Some(current) if current == desired_enabled => IndexerAction::NoOp,
            _ if desired_enabled => IndexerAction::Enable,
            _ => IndexerAction::Disable,
        };

        ActionSet {
            indexer,
            indexer_reason,
            removals,
            resumes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::InventoryTorrent;
    use crate::torrent::TorrentRecord;

    const KIB: u64 = 1024;
    const TIB: u64 = 1024 * 1024 * 1024 * 1024;

    fn torrent(
        hash: &str,
        size: u64,
        state: TorrentState,
        seed_remaining: i64,
        avg: Option<f64>,
    ) -> InventoryTorrent {
        InventoryTorrent {
            record: TorrentRecord {
                hash: hash.to_string(),
                name: format!("torrent-{hash}"),
                size_bytes: size,
                category: "autobrr".to_string(),
                state,
                min_seed_time_remaining_secs: seed_remaining,
            },
            upload_avg: avg,
        }
    }

    fn inventory(torrents: Vec<InventoryTorrent>) -> Inventory {
        let total_size_bytes = torrents.iter().map(|t| t.record.size_bytes).sum();
        Inventory {
            torrents,
            total_size_bytes,
        }
    }

    fn engine(enforcement: EnforcementMode, max_size: u64) -> PolicyEngine {
        PolicyEngine::new(PolicyConfig {
            enforcement,
            max_total_size_bytes: max_size,
            ..PolicyConfig::default()
        })
    }

    #[test]
    fn low_global_average_enables_indexer() {
        // Scenario: 500 KB/s average against a 1 MB/s threshold.
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![]);

        let actions = engine.evaluate(&inv, Some(512_000.0), Some(false));
        assert_eq!(actions.indexer, IndexerAction::Enable);

        // Already enabled: redundant call avoided.
        let actions = engine.evaluate(&inv, Some(512_000.0), Some(true));
        assert_eq!(actions.indexer, IndexerAction::NoOp);
    }

    #[test]
    fn high_global_average_disables_indexer() {
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![]);

        let actions = engine.evaluate(&inv, Some(2_097_152.0), Some(true));
        assert_eq!(actions.indexer, IndexerAction::Disable);
    }

    #[test]
    fn undefined_global_average_bootstraps_to_enabled() {
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![]);

        let actions = engine.evaluate(&inv, None, Some(false));
        assert_eq!(actions.indexer, IndexerAction::Enable);
    }

    #[test]
    fn unknown_indexer_state_emits_explicit_transition() {
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![]);

        let actions = engine.evaluate(&inv, Some(512_000.0), None);
        assert_eq!(actions.indexer, IndexerAction::Enable);
    }

    #[test]
    fn over_budget_disables_indexer_even_with_low_global_average() {
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![torrent(
            "a",
            2 * TIB,
            TorrentState::Seeding,
            3600,
            None,
        )]);

        let actions = engine.evaluate(&inv, Some(0.0), Some(true));
        assert_eq!(actions.indexer, IndexerAction::Disable);
    }

    #[test]
    fn strict_mode_removes_all_satisfied_torrents_when_over_budget() {
        // Scenario: 1.2 TiB against a 1 TiB budget in strict mode.
        let engine = engine(EnforcementMode::Strict, TIB);
        let inv = inventory(vec![
            // Satisfied obligation, fast uploader: removed anyway.
            torrent("x", TIB, TorrentState::ForcedSeeding, 0, Some(1e9)),
            // Obligation not yet satisfied: kept.
            torrent("y", TIB / 5, TorrentState::Seeding, 3600, Some(0.0)),
        ]);

        let actions = engine.evaluate(&inv, Some(0.0), Some(true));

        assert_eq!(actions.indexer, IndexerAction::Disable);
        assert_eq!(actions.removals.len(), 1);
        assert_eq!(actions.removals[0].hash, "x");
    }

    #[test]
    fn relaxed_mode_never_removes_for_size_alone() {
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![torrent(
            "x",
            2 * TIB,
            TorrentState::ForcedSeeding,
            0,
            Some(1e9),
        )]);

        let actions = engine.evaluate(&inv, Some(0.0), Some(true));

        assert_eq!(actions.indexer, IndexerAction::Disable);
        assert!(actions.removals.is_empty());
    }

    #[test]
    fn slow_torrent_with_satisfied_obligation_is_removed() {
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![torrent(
            "slow",
            KIB,
            TorrentState::Seeding,
            -10,
            Some(100.0),
        )]);

        let actions = engine.evaluate(&inv, Some(0.0), Some(true));

        assert_eq!(actions.removals.len(), 1);
        assert_eq!(actions.removals[0].hash, "slow");
    }

    #[test]
    fn seed_obligation_gates_removal() {
        // Scenario: slow torrent, but its seed obligation is not satisfied.
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![torrent(
            "y",
            KIB,
            TorrentState::Seeding,
            7200,
            Some(0.0),
        )]);

        let actions = engine.evaluate(&inv, Some(0.0), Some(true));
        assert!(actions.removals.is_empty());
    }

    #[test]
    fn undefined_average_never_removes() {
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![torrent("z", KIB, TorrentState::Seeding, 0, None)]);

        let actions = engine.evaluate(&inv, Some(0.0), Some(true));
        assert!(actions.removals.is_empty());
    }

    #[test]
    fn size_gate_and_throughput_gate_flagging_same_torrent_dedupes() {
        let engine = engine(EnforcementMode::Strict, TIB);
        // Over budget, obligation satisfied, and slow: flagged by both rules.
        let inv = inventory(vec![torrent(
            "both",
            2 * TIB,
            TorrentState::Seeding,
            0,
            Some(1.0),
        )]);

        let actions = engine.evaluate(&inv, Some(0.0), Some(true));

        assert_eq!(actions.removals.len(), 1);
        // Size gate precedence: its reason wins.
        assert!(actions.removals[0].reason.contains("strict enforcement"));
    }

    #[test]
    fn stopped_torrent_meeting_threshold_is_resumed() {
        let engine = engine(EnforcementMode::Relaxed, TIB);
        let inv = inventory(vec![torrent(
            "fast",
            KIB,
            TorrentState::Completed,
            0,
            Some(1e6),
        )]);

        let actions = engine.evaluate(&inv, Some(0.0), Some(true));

        assert!(actions.removals.is_empty());
        assert_eq!(actions.resumes.len(), 1);
        assert_eq!(actions.resumes[0].hash, "fast");
    }

    #[test]
    fn removed_torrent_is_not_also_resumed() {
        let engine = engine(EnforcementMode::Strict, TIB);
        let inv = inventory(vec![torrent(
            "x",
            2 * TIB,
            TorrentState::Completed,
            0,
            Some(1e6),
        )]);

        let actions = engine.evaluate(&inv, Some(0.0), Some(true));

        assert_eq!(actions.removals.len(), 1);
        assert!(actions.resumes.is_empty());
    }

    #[test]
    fn evaluation_is_idempotent_on_an_unchanged_snapshot() {
        let engine = engine(EnforcementMode::Strict, TIB);
        let inv = inventory(vec![
            torrent("a", TIB, TorrentState::Seeding, 0, Some(1.0)),
            torrent("b", TIB / 2, TorrentState::Completed, 0, Some(1e6)),
            torrent("c", KIB, TorrentState::Seeding, 3600, None),
        ]);

        let first = engine.evaluate(&inv, Some(512_000.0), Some(true));
        let second = engine.evaluate(&inv, Some(512_000.0), Some(true));
        assert_eq!(first, second);
    }
}
