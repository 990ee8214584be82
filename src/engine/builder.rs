//! Builder for configuring engine instances

use std::sync::Arc;

use super::{MealEngine, MealGenerator};
use crate::cache::{CacheConfig, DurableCache};
use crate::catalog::{ImageTable, TemplateCatalog};
use crate::matcher::{MatcherConfig, TemplateMatcher};
use crate::store::{MemoryStore, SignatureStore};
use crate::{LarderError, Result};

/// Builder for configuring engine instances.
///
/// Everything is optional: the default engine has a 1,000-entry, one-hour
/// tier 1 over a [`MemoryStore`], an empty catalog, and no generator.
pub struct MealEngineBuilder {
    cache_config: CacheConfig,
    matcher_config: MatcherConfig,
    store: Option<Arc<dyn SignatureStore>>,
    catalog: Arc<TemplateCatalog>,
    images: Arc<ImageTable>,
    generator: Option<Arc<dyn MealGenerator>>,
}

impl MealEngineBuilder {
    pub fn new() -> Self {
        Self {
            cache_config: CacheConfig::default(),
            matcher_config: MatcherConfig::default(),
            store: None,
            catalog: Arc::new(TemplateCatalog::new()),
            images: Arc::new(ImageTable::default()),
            generator: None,
        }
    }

    /// Size and TTL of the in-process tier.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Matching limits and the pre-generation acceptance score.
    pub fn matcher_config(mut self, config: MatcherConfig) -> Self {
        self.matcher_config = config;
        self
    }

    /// Durable backend (default: [`MemoryStore`]).
    pub fn store(mut self, store: Arc<dyn SignatureStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Template catalog used for matching and fallback.
    pub fn catalog(mut self, catalog: impl Into<Arc<TemplateCatalog>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Image-key resolution table.
    pub fn images(mut self, images: impl Into<Arc<ImageTable>>) -> Self {
        self.images = images.into();
        self
    }

    /// External generation step used by [`MealEngine::resolve`].
    pub fn generator(mut self, generator: Arc<dyn MealGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`LarderError::Configuration`] for a zero-capacity or
    /// zero-TTL tier 1.
    pub fn build(self) -> Result<MealEngine> {
        if self.cache_config.max_entries == 0 {
            return Err(LarderError::Configuration(
                "cache max_entries must be at least 1".to_string(),
            ));
        }
        if self.cache_config.ttl.is_zero() {
            return Err(LarderError::Configuration(
                "cache ttl must be non-zero".to_string(),
            ));
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn SignatureStore>);

        Ok(MealEngine::new(
            DurableCache::new(&self.cache_config, store),
            TemplateMatcher::new(self.catalog, self.images, self.matcher_config),
            self.generator,
        ))
    }
}

impl Default for MealEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
