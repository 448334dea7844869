//! Engine configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_PATH: &str = "./data/bestiary";
pub const DEFAULT_OVERFLOW_LOG: &str = "overflow.jsonl";

/// Where documents come from, where results and diagnostics go, and how often
/// to sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory of raw actor documents (`BESTIARY_DATA_PATH`)
    pub data_path: PathBuf,
    /// Remote repository base URL; takes precedence over `data_path` when set
    /// (`BESTIARY_REMOTE_URL`)
    pub remote_url: Option<String>,
    /// Directory assembled monsters are written to (`BESTIARY_OUTPUT_PATH`)
    pub output_path: Option<PathBuf>,
    /// JSON-lines overflow log (`BESTIARY_OVERFLOW_LOG`)
    pub overflow_log: PathBuf,
    /// `None` runs a single sync (`BESTIARY_SYNC_INTERVAL_SECS`, 0 = once)
    pub sync_interval: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            remote_url: None,
            output_path: None,
            overflow_log: PathBuf::from(DEFAULT_OVERFLOW_LOG),
            sync_interval: None,
        }
    }
}

impl EngineConfig {
    /// Read configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let sync_interval = match var("BESTIARY_SYNC_INTERVAL_SECS").map(|s| s.parse::<u64>()) {
            Some(Ok(0)) | None => None,
            Some(Ok(secs)) => Some(Duration::from_secs(secs)),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Invalid BESTIARY_SYNC_INTERVAL_SECS, running once");
                None
            }
        };

        Self {
            data_path: var("BESTIARY_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            remote_url: var("BESTIARY_REMOTE_URL"),
            output_path: var("BESTIARY_OUTPUT_PATH").map(PathBuf::from),
            overflow_log: var("BESTIARY_OVERFLOW_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OVERFLOW_LOG)),
            sync_interval,
        }
    }
}
