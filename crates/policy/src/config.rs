use std::str::FromStr;

use thiserror::Error;

/// How the aggregate size budget is enforced when exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnforcementMode {
    /// Over budget removes every torrent whose seed obligation is satisfied.
    Strict,
    /// Over budget only pauses acquisition; no torrent is removed for size.
    Relaxed,
}

impl EnforcementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Relaxed => "relaxed",
        }
    }
}

impl FromStr for EnforcementMode {
    type Err = PolicyConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "relaxed" => Ok(Self::Relaxed),
            other => Err(PolicyConfigError::InvalidEnforcementMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum PolicyConfigError {
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),

    #[error("enforcement mode must be \"strict\" or \"relaxed\", got \"{0}\"")]
    InvalidEnforcementMode(String),

    #[error("category filter must not be empty")]
    EmptyCategory,
}

/// Policy configuration, immutable for the duration of one cycle.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Only torrents in this category are visible to the engine.
    pub category: String,
    /// Global upload threshold in bytes/sec.
    pub global_threshold_bytes: u64,
    /// Horizon for the global upload average, in seconds.
    pub global_horizon_secs: u64,
    /// Per-torrent upload threshold in bytes/sec.
    pub torrent_threshold_bytes: u64,
    /// Horizon for per-torrent upload averages, in seconds.
    pub torrent_horizon_secs: u64,
    /// Maximum aggregate size across all filtered torrents, in bytes.
    pub max_total_size_bytes: u64,
    pub enforcement: EnforcementMode,
    /// When set, actions are logged but never applied.
    pub simulate: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            category: "autobrr".to_string(),
            global_threshold_bytes: 1_048_576,        // 1 MiB/s
            global_horizon_secs: 43_200,              // 12 hours
            torrent_threshold_bytes: 10_240,          // 10 KiB/s
            torrent_horizon_secs: 432_000,            // 5 days
            max_total_size_bytes: 1_099_511_627_776,  // 1 TiB
            enforcement: EnforcementMode::Relaxed,
            simulate: true,
        }
    }
}

impl PolicyConfig {
    /// Reject malformed configuration before the engine runs.
    pub fn validate(&self) -> Result<(), PolicyConfigError> {
        if self.category.is_empty() {
            return Err(PolicyConfigError::EmptyCategory);
        }
        for (value, name) in [
            (self.global_threshold_bytes, "global upload threshold"),
            (self.global_horizon_secs, "global time horizon"),
            (self.torrent_threshold_bytes, "per-torrent upload threshold"),
            (self.torrent_horizon_secs, "per-torrent time horizon"),
            (self.max_total_size_bytes, "max aggregate size"),
        ] {
            if value == 0 {
                return Err(PolicyConfigError::NonPositive(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PolicyConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_threshold() {
        let config = PolicyConfig {
            global_threshold_bytes: 0,
            ..PolicyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PolicyConfigError::NonPositive(_))
        ));
    }

    #[test]
    fn rejects_empty_category() {
        let config = PolicyConfig {
            category: String::new(),
            ..PolicyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PolicyConfigError::EmptyCategory)
        ));
    }

    #[test]
    fn parses_enforcement_mode() {
        assert_eq!("strict".parse::<EnforcementMode>().unwrap(), EnforcementMode::Strict);
        assert_eq!("relaxed".parse::<EnforcementMode>().unwrap(), EnforcementMode::Relaxed);
        assert!("lenient".parse::<EnforcementMode>().is_err());
    }
}
