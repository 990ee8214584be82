//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (explicit; must exist)
//! 2. `~/.larder/config.toml` (user)
//! 3. `/etc/larder/config.toml` (system)
//! 4. built-in defaults
//!
//! ```toml
//! [cache]
//! ttl_secs = 3600
//! max_entries = 1000
//!
//! [store]
//! backend = "file"
//! path = "/var/lib/larder/signatures.json"
//!
//! [catalog]
//! templates = "/etc/larder/templates.json"
//! images = "/etc/larder/images.json"
//!
//! [matcher]
//! max_results = 3
//! accept_score = 1.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::cache::CacheConfig;
use crate::catalog::{ImageTable, TemplateCatalog};
use crate::engine::MealEngineBuilder;
use crate::matcher::MatcherConfig;
use crate::store::{JsonFileStore, MemoryStore, SignatureStore, default_store_path};
use crate::{LarderError, Result};

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub matcher: MatcherSection,
}

/// In-process tier settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Entry time-to-live in seconds (default: 3600).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum entries (default: 1000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_entries() -> u64 {
    1_000
}

/// Durable backend kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

/// Durable tier settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,
    /// File path for the `file` backend (default: `~/.cache/larder/signatures.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Static catalog inputs. Both files are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSection {
    /// JSON array of meal templates.
    #[serde(default)]
    pub templates: Option<PathBuf>,
    /// JSON image table.
    #[serde(default)]
    pub images: Option<PathBuf>,
}

/// Matcher settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MatcherSection {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_accept_score")]
    pub accept_score: f64,
}

impl Default for MatcherSection {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            accept_score: default_accept_score(),
        }
    }
}

fn default_max_results() -> usize {
    3
}

fn default_accept_score() -> f64 {
    1.0
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Falls back to defaults when no file exists; an explicit path that
    /// does not exist is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    LarderError::Configuration(format!("Failed to read config file {path:?}: {e}"))
                })?;
                info!(path = %path.display(), "loaded configuration");
                Self::from_toml(&content).map_err(|e| {
                    LarderError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LarderError::Configuration(e.to_string()))
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(LarderError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".larder").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/larder/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Tier-1 settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .max_entries(self.cache.max_entries)
            .ttl(Duration::from_secs(self.cache.ttl_secs))
    }

    /// Matcher settings.
    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig::new()
            .max_results(self.matcher.max_results)
            .accept_score(self.matcher.accept_score)
    }

    /// Open the configured durable backend.
    pub async fn open_store(&self) -> Result<Arc<dyn SignatureStore>> {
        Ok(match self.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::File => {
                let path = self.store.path.clone().unwrap_or_else(default_store_path);
                Arc::new(JsonFileStore::open(path).await?)
            }
        })
    }

    /// An engine builder with every configured component applied.
    ///
    /// A generator, if any, is still added by the caller.
    pub async fn engine_builder(&self) -> Result<MealEngineBuilder> {
        let mut builder = MealEngineBuilder::new()
            .cache_config(self.cache_config())
            .matcher_config(self.matcher_config())
            .store(self.open_store().await?);

        if let Some(ref path) = self.catalog.templates {
            builder = builder.catalog(TemplateCatalog::load(path)?);
        }
        if let Some(ref path) = self.catalog.images {
            builder = builder.images(ImageTable::load(path)?);
        }

        Ok(builder)
    }
}
