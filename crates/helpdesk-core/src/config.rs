use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::storage::{FileStore, KeyValueStore, MemoryStore, Persistence, SqliteStore};

pub const CONFIG_FILE: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "HELPDESK_DATA_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpdeskConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub tickets: TicketsConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub suggest: SuggestConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub session_backend: SessionBackend,
}

/// How the ticket store picks the next id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    /// One past the largest id ever assigned, persisted separately. Never reuses ids.
    #[default]
    Monotonic,
    /// One past the largest live id. Reuses the id of a deleted newest ticket.
    MaxPlusOne,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketsConfig {
    #[serde(default)]
    pub id_strategy: IdStrategy,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            recent_limit: default_recent_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_true")]
    pub seed_demo_accounts: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            seed_demo_accounts: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestConfig {
    #[serde(default = "default_suggest_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_suggest_timeout_ms(),
        }
    }
}

impl SuggestConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Load `<data_dir>/config.toml`, or defaults when the file is absent.
pub fn load_config(data_dir: &Path) -> Result<HelpdeskConfig> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(HelpdeskConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<HelpdeskConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Platform data directory for helpdesk, falling back to `./.helpdesk`.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".helpdesk"), |dir| dir.join("helpdesk"))
}

/// Resolve the data directory. Precedence: explicit flag, then
/// `HELPDESK_DATA_DIR`, then the platform default.
#[must_use]
pub fn resolve_data_dir(flag: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    flag.or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(default_data_dir)
}

/// Build the persistence adapter described by `config` under `data_dir`.
pub fn open_persistence(config: &HelpdeskConfig, data_dir: &Path) -> Result<Persistence> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let durable: Arc<dyn KeyValueStore> = match config.storage.backend {
        Backend::File => Arc::new(
            FileStore::open(data_dir.join("store")).context("Failed to open file store")?,
        ),
        Backend::Sqlite => Arc::new(
            SqliteStore::open(&data_dir.join("helpdesk.db"))
                .context("Failed to open sqlite store")?,
        ),
        Backend::Memory => Arc::new(MemoryStore::new()),
    };

    let session: Arc<dyn KeyValueStore> = match config.storage.session_backend {
        SessionBackend::File => Arc::new(
            FileStore::open(data_dir.join("session")).context("Failed to open session store")?,
        ),
        SessionBackend::Memory => Arc::new(MemoryStore::new()),
    };

    tracing::debug!(
        data_dir = %data_dir.display(),
        durable = durable.backend_name(),
        session = session.backend_name(),
        "opened persistence"
    );
    Ok(Persistence::new(durable, session))
}

const fn default_true() -> bool {
    true
}

const fn default_recent_limit() -> usize {
    5
}

const fn default_suggest_timeout_ms() -> u64 {
    2_000
}
