//! Durable signature storage.
//!
//! The tier-2 cache talks to storage only through [`SignatureStore`].
//! Any backend that offers a unique key on the signature hash and an
//! atomic "insert, ignore on conflict" write can implement it.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`] - process-local, for tests and single-process use.
//! - [`JsonFileStore`] - a JSON file on disk, rewritten atomically on
//!   every mutation. Suitable for a single writer process.
//!
//! # Example
//!
//! ```ignore
//! // A SQL backend maps the contract onto a unique index:
//! async fn insert_if_absent(&self, row: PersistedResult) -> Result<bool> {
//!     let n = sqlx::query("INSERT INTO meal_cache (...) VALUES (...) ON CONFLICT (signature_hash) DO NOTHING")
//!         .execute(&self.pool).await?.rows_affected();
//!     Ok(n == 1)
//! }
//! ```

mod file;
mod memory;

pub use file::{JsonFileStore, default_store_path};
pub use memory::MemoryStore;

use std::time::SystemTime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{LarderError, Result};
use crate::types::{Macros, Meal, MealSlot, ResultSource};

/// One durable cache row.
///
/// Created once on the first store for a hash; afterwards only
/// `hit_count` and `last_accessed_at` change. Retention is left to
/// operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedResult {
    /// Unique key.
    pub signature_hash: String,
    /// Full signature, kept for inspection and collision checks.
    pub signature: String,
    pub meal_slot: MealSlot,
    pub source: ResultSource,
    /// JSON-serialised `Vec<Meal>`.
    pub payload: String,
    /// Macros of the first meal in the payload, denormalised so rows can
    /// be filtered without parsing `payload`.
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Starts at 1; incremented on every later hit.
    pub hit_count: u64,
    pub last_accessed_at: SystemTime,
    pub created_at: SystemTime,
}

impl PersistedResult {
    /// Build a fresh row for `meals`.
    ///
    /// # Errors
    ///
    /// [`LarderError::InvalidInput`] when any meal carries a NaN or
    /// infinite number. serde_json would write those as `null` and the row
    /// could never be read back.
    pub fn new(
        signature_hash: impl Into<String>,
        signature: impl Into<String>,
        meal_slot: MealSlot,
        source: ResultSource,
        meals: &[Meal],
    ) -> Result<Self> {
        if let Some(meal) = meals.iter().find(|m| !m.is_finite()) {
            return Err(LarderError::InvalidInput(format!(
                "meal '{}' has a non-finite macro or quantity",
                meal.id
            )));
        }
        let payload = serde_json::to_string(meals)?;
        let macros = meals.first().map(|m| m.macros).unwrap_or_default();
        let now = SystemTime::now();
        Ok(Self {
            signature_hash: signature_hash.into(),
            signature: signature.into(),
            meal_slot,
            source,
            payload,
            calories: macros.calories,
            protein: macros.protein,
            carbs: macros.carbs,
            fat: macros.fat,
            hit_count: 1,
            last_accessed_at: now,
            created_at: now,
        })
    }

    /// Decode the stored payload.
    pub fn meals(&self) -> Result<Vec<Meal>> {
        Ok(serde_json::from_str(&self.payload)?)
    }

    /// The denormalised macro snapshot.
    pub fn macros(&self) -> Macros {
        Macros::new(self.calories, self.protein, self.carbs, self.fat)
    }
}

/// Durable key/row store for cached meal payloads.
///
/// Errors returned here never reach end users: the tier-2 cache logs them
/// and treats the call as a miss (reads) or a skipped write (writes).
#[async_trait]
pub trait SignatureStore: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the row for `hash`, if any.
    async fn fetch(&self, hash: &str) -> Result<Option<PersistedResult>>;

    /// Insert `row` unless a row with the same hash exists.
    ///
    /// Must be atomic: concurrent callers racing on one hash see exactly
    /// one `Ok(true)`. Returns `Ok(false)` when the row already existed.
    async fn insert_if_absent(&self, row: PersistedResult) -> Result<bool>;

    /// Increment the hit count and stamp the access time. A missing row
    /// is not an error.
    async fn record_hit(&self, hash: &str, at: SystemTime) -> Result<()>;
}
