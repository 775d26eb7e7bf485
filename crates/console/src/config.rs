//! Environment configuration.

use std::path::PathBuf;

use bss_observability::LogFormat;

pub const DATA_DIR_ENV: &str = "BSS_DATA_DIR";
pub const STORE_ENV: &str = "BSS_STORE";
pub const LOG_FORMAT_ENV: &str = bss_observability::tracing::LOG_FORMAT_ENV;

const DEFAULT_DATA_DIR: &str = "data";

/// Where console state is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Process memory; state is lost on exit.
    Memory,
    /// SQLite database URL or file path.
    Sqlite(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Directory holding the `<name>.json` seed fixtures.
    pub data_dir: PathBuf,
    pub store: StoreConfig,
    pub log_format: LogFormat,
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Missing values fall back to defaults
    /// with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = var(DATA_DIR_ENV).map(PathBuf::from).unwrap_or_else(|| {
            tracing::warn!("{DATA_DIR_ENV} not set; using ./{DEFAULT_DATA_DIR}");
            PathBuf::from(DEFAULT_DATA_DIR)
        });

        let store = match var(STORE_ENV) {
            Some(v) if v.eq_ignore_ascii_case("memory") => StoreConfig::Memory,
            Some(v) => StoreConfig::Sqlite(v),
            None => match default_store_path() {
                Some(path) => {
                    tracing::warn!(path = %path.display(), "{STORE_ENV} not set; using default SQLite store");
                    StoreConfig::Sqlite(path.to_string_lossy().into_owned())
                }
                None => {
                    tracing::warn!("{STORE_ENV} not set and no data directory available; state will not persist");
                    StoreConfig::Memory
                }
            },
        };

        let log_format = match var(LOG_FORMAT_ENV) {
            Some(v) => v.parse().unwrap_or_else(|err: String| {
                tracing::warn!("{err}; using json");
                LogFormat::Json
            }),
            None => LogFormat::Json,
        };

        Self {
            data_dir,
            store,
            log_format,
        }
    }
}

/// `<OS data dir>/bss-console/store.db`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("bss-console").join("store.db"))
}
