use std::str::FromStr;

use thiserror::Error;

use policy::{EnforcementMode, PolicyConfig, PolicyConfigError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: \"{value}\"")]
    Invalid { key: &'static str, value: String },

    #[error("Invalid policy configuration: {0}")]
    Policy(#[from] PolicyConfigError),
}

/// Full monitor configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub policy: PolicyConfig,
    pub qbittorrent_url: String,
    pub qbittorrent_username: String,
    pub qbittorrent_password: String,
    pub prometheus_url: String,
    pub autobrr_url: String,
    pub autobrr_api_key: String,
    /// Indexer to toggle; "all" targets every configured indexer.
    pub indexer_name: String,
    /// Minutes between evaluation cycles, minimum 1.
    pub cycle_interval_mins: u64,
}

impl MonitorConfig {
    /// Load and validate configuration from process environment variables.
    /// Any missing required key or malformed value is fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let policy = PolicyConfig {
            category: get("TORRENT_CATEGORY_FILTER").unwrap_or_else(|| "autobrr".to_string()),
            global_threshold_bytes: parse_or(
                &get,
                "GLOBAL_UPLOAD_THRESHOLD_BYTES",
                1_048_576,
            )?,
            global_horizon_secs: parse_or(&get, "GLOBAL_TIME_HORIZON_SECONDS", 43_200)?,
            torrent_threshold_bytes: parse_or(
                &get,
                "TORRENT_UPLOAD_THRESHOLD_BYTES",
                10_240,
            )?,
            torrent_horizon_secs: parse_or(&get, "TORRENT_TIME_HORIZON_SECONDS", 432_000)?,
            max_total_size_bytes: parse_or(&get, "MAX_TORRENTS_SIZE_BYTES", 1_099_511_627_776)?,
            enforcement: match get("ENFORCE_MAX_SIZE_POLICY") {
                Some(value) => {
                    EnforcementMode::from_str(&value).map_err(|_| ConfigError::Invalid {
                        key: "ENFORCE_MAX_SIZE_POLICY",
                        value,
                    })?
                }
                None => EnforcementMode::Relaxed,
            },
            simulate: parse_flag(&get, "SIMULATION_MODE", true)?,
        };
        policy.validate()?;

        let cycle_interval_mins = parse_or(&get, "CYCLE_INTERVAL_MINUTES", 1)?;
        if cycle_interval_mins < 1 {
            return Err(ConfigError::Invalid {
                key: "CYCLE_INTERVAL_MINUTES",
                value: cycle_interval_mins.to_string(),
            });
        }

        Ok(Self {
            policy,
            qbittorrent_url: required(&get, "QBITTORRENT_URL")?,
            qbittorrent_username: required(&get, "QBITTORRENT_USERNAME")?,
            qbittorrent_password: required(&get, "QBITTORRENT_PASSWORD")?,
            prometheus_url: required(&get, "PROMETHEUS_URL")?,
            autobrr_url: required(&get, "AUTOBRR_URL")?,
            autobrr_api_key: required(&get, "AUTOBRR_API_KEY")?,
            indexer_name: required(&get, "AUTOBRR_INDEXER_NAME")?,
            cycle_interval_mins,
        })
    }
}

fn required(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    match get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parse_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match get(key) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_flag(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match get(key) {
        Some(value) => match value.as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}
