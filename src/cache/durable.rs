//! Tier-2 durable cache.
//!
//! [`DurableCache`] layers a [`SignatureStore`] under the in-process
//! [`MemoryCache`]:
//!
//! ```text
//! lookup: tier 1 ──hit──▶ "memory"
//!            │ miss
//!            ▼
//!         store.fetch ──hit──▶ promote to tier 1, record hit ──▶ "database"
//!            │ miss / error / undecodable / collision
//!            ▼
//!          None
//!
//! store:  tier 1 (always) ──▶ store.insert_if_absent (first writer wins)
//! ```
//!
//! Storage failures are absorbed here: they are logged, counted, and read
//! as misses. Nothing in this module returns an error to the caller.
//!
//! # Collisions
//!
//! Keys are short non-cryptographic hashes. Both tiers keep the full
//! signature next to the payload and a lookup only hits when the stored
//! signature equals the requested one; anything else counts as a miss.

use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, warn};

use super::memory::{CacheConfig, MemoryCache};
use crate::signature::Signature;
use crate::store::{PersistedResult, SignatureStore};
use crate::telemetry;
use crate::types::{Meal, ResultSource};

/// Tier-1 value: the payload plus what is needed to verify and label it.
#[derive(Debug, Clone)]
pub struct CachedMeals {
    pub signature: String,
    pub meals: Arc<Vec<Meal>>,
    pub source: ResultSource,
}

/// Which tier answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTier {
    Memory,
    Database,
}

impl HitTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitTier::Memory => "memory",
            HitTier::Database => "database",
        }
    }
}

/// A successful cache lookup.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub meals: Vec<Meal>,
    pub tier: HitTier,
    /// Who originally produced the payload.
    pub source: ResultSource,
}

/// Result of the durable half of a [`DurableCache::store`].
///
/// Informative only: tier 1 is written in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// This call created the durable row.
    Inserted,
    /// Another writer got there first; its payload stays durable.
    AlreadyPresent,
    /// The durable write failed and was skipped.
    Failed,
}

impl StoreOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOutcome::Inserted => "inserted",
            StoreOutcome::AlreadyPresent => "already_present",
            StoreOutcome::Failed => "failed",
        }
    }
}

/// Two-tier signature cache.
pub struct DurableCache {
    memory: MemoryCache<CachedMeals>,
    store: Arc<dyn SignatureStore>,
}

impl DurableCache {
    /// Create a cache over `store` with a fresh tier 1 sized by `config`.
    pub fn new(config: &CacheConfig, store: Arc<dyn SignatureStore>) -> Self {
        Self {
            memory: MemoryCache::new(config),
            store,
        }
    }

    /// The in-process tier.
    pub fn memory(&self) -> &MemoryCache<CachedMeals> {
        &self.memory
    }

    /// The durable backend.
    pub fn backend(&self) -> &Arc<dyn SignatureStore> {
        &self.store
    }

    /// Look `signature` up in tier 1, then durable storage.
    ///
    /// Returns `None` on a true miss and on any storage failure.
    pub async fn lookup(&self, signature: &Signature) -> Option<CacheHit> {
        let hash = signature.hash_key();

        if let Some(entry) = self.memory.get(&hash) {
            if entry.signature == signature.as_str() {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "tier" => "memory").increment(1);
                return Some(CacheHit {
                    meals: entry.meals.as_ref().clone(),
                    tier: HitTier::Memory,
                    source: entry.source,
                });
            }
            record_collision(&hash, &entry.signature, signature.as_str());
        }

        let hit = self.lookup_durable(&hash, signature).await;
        if hit.is_none() {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        }
        hit
    }

    async fn lookup_durable(&self, hash: &str, signature: &Signature) -> Option<CacheHit> {
        let row = match self.store.fetch(hash).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                debug!(%hash, "signature cache miss");
                return None;
            }
            Err(e) => {
                warn!(%hash, store = self.store.name(), error = %e, "durable lookup failed, treating as miss");
                metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "operation" => "lookup")
                    .increment(1);
                return None;
            }
        };

        if row.signature != signature.as_str() {
            record_collision(hash, &row.signature, signature.as_str());
            return None;
        }

        let meals = match row.meals() {
            Ok(meals) => meals,
            Err(e) => {
                warn!(%hash, error = %e, "undecodable cached payload, treating as miss");
                return None;
            }
        };

        self.memory.set(
            hash.to_string(),
            CachedMeals {
                signature: row.signature.clone(),
                meals: Arc::new(meals.clone()),
                source: row.source,
            },
        );
        metrics::counter!(telemetry::CACHE_PROMOTIONS_TOTAL).increment(1);

        if let Err(e) = self.store.record_hit(hash, SystemTime::now()).await {
            warn!(%hash, error = %e, "failed to record cache hit");
            metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "operation" => "record_hit")
                .increment(1);
        }

        metrics::counter!(telemetry::CACHE_HITS_TOTAL, "tier" => "database").increment(1);
        Some(CacheHit {
            meals,
            tier: HitTier::Database,
            source: row.source,
        })
    }

    /// Cache `meals` under `signature` in both tiers.
    ///
    /// Tier 1 is overwritten unconditionally so the caller's next lookup
    /// sees its own payload. The durable write is insert-or-ignore and its
    /// failures are logged, not returned. Payloads with non-finite numbers
    /// never reach the durable tier.
    pub async fn store(
        &self,
        signature: &Signature,
        meals: Vec<Meal>,
        source: ResultSource,
    ) -> StoreOutcome {
        let hash = signature.hash_key();
        let meals = Arc::new(meals);

        self.memory.set(
            hash.clone(),
            CachedMeals {
                signature: signature.as_str().to_string(),
                meals: Arc::clone(&meals),
                source,
            },
        );

        let outcome = match PersistedResult::new(
            hash.as_str(),
            signature.as_str(),
            signature.slot(),
            source,
            &meals,
        ) {
            Ok(row) => match self.store.insert_if_absent(row).await {
                Ok(true) => StoreOutcome::Inserted,
                Ok(false) => {
                    debug!(%hash, "durable row already present, keeping first writer");
                    StoreOutcome::AlreadyPresent
                }
                Err(e) => {
                    warn!(%hash, store = self.store.name(), error = %e, "durable write failed");
                    metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "operation" => "insert")
                        .increment(1);
                    StoreOutcome::Failed
                }
            },
            Err(e) => {
                warn!(%hash, error = %e, "meal payload not persistable, skipping durable write");
                StoreOutcome::Failed
            }
        };

        metrics::counter!(telemetry::STORES_TOTAL, "outcome" => outcome.as_str()).increment(1);
        outcome
    }
}

fn record_collision(hash: &str, stored: &str, requested: &str) {
    warn!(%hash, stored, requested, "signature hash collision");
    metrics::counter!(telemetry::SIGNATURE_COLLISIONS_TOTAL).increment(1);
}
