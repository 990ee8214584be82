//! Caching subsystem.
//!
//! Two tiers, both keyed on the signature hash:
//!
//! - [`memory::MemoryCache`] - bounded LRU + TTL in-process cache. Never
//!   blocks; checked first on every lookup.
//!
//! - [`durable::DurableCache`] - wraps a tier-1 cache around a
//!   [`SignatureStore`](crate::store::SignatureStore). Durable hits are
//!   promoted back into tier 1; storage failures read as misses.

pub mod durable;
pub mod memory;

pub use durable::{CacheHit, CachedMeals, DurableCache, HitTier, StoreOutcome};
pub use memory::{CacheConfig, MemoryCache};
