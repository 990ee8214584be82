//! Larder - ingredient-signature caching and template matching for meal planning
//!
//! Given a requested combination of ingredients, a meal slot, and optional
//! cooking methods, larder answers "do we already have a meal for this?"
//! cheaply and deterministically, before an expensive generation step is
//! attempted, and guarantees that some valid meal is always returned.
//!
//! Request → [signature](signature) → hash → tier-1 [cache](cache) →
//! tier-2 [store](store) → (miss) → [matcher] or caller-driven generation →
//! write-back into both tiers.
//!
//! # Example
//!
//! ```rust
//! use larder::{MealEngine, MealSlot, ResultSource, SignatureInput};
//! use larder::cache::HitTier;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> larder::Result<()> {
//! let engine = MealEngine::builder().build()?;
//! let input = SignatureInput::new(MealSlot::Dinner, ["Chicken Breast", "Broccoli", "Rice"]);
//!
//! assert_eq!(engine.signature(&input).as_str(), "dinner|broccoli+chicken_breast+rice");
//! assert!(engine.lookup(&input).await.is_none());
//!
//! // Generate outside the engine, then cache it.
//! let meal = engine.deterministic_fallback(MealSlot::Dinner, &input.ingredients);
//! engine.store(&input, vec![meal], ResultSource::Ai).await;
//!
//! let hit = engine.lookup(&input).await.expect("cached");
//! assert_eq!(hit.tier, HitTier::Memory);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod signature;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheHit, HitTier, MemoryCache, StoreOutcome};
pub use catalog::{ImageTable, TemplateCatalog};
pub use engine::{MealEngine, MealEngineBuilder, MealGenerator, Origin, Resolution};
pub use error::{LarderError, Result};
pub use matcher::{MatcherConfig, TemplateMatcher};
pub use signature::{Signature, build_signature, normalize, signature_hash};
pub use store::{JsonFileStore, MemoryStore, PersistedResult, SignatureStore};

// Re-export all types
pub use types::{
    Macros, MatchResult, MatchType, Meal, MealIngredient, MealSlot, MealTemplate, ResultSource,
    SignatureInput, TemplateIngredient,
};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
