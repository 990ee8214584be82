//! Telemetry metric name constants.
//!
//! Centralised metric names for larder operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `larder_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `tier` - cache tier that answered: "memory" or "database"
//! - `operation` - durable store call: "lookup", "insert" or "record_hit"
//! - `outcome` - durable write result: "inserted", "already_present" or "failed"
//! - `origin` - where a resolved meal came from (see [`Origin`](crate::engine::Origin))

/// Total cache hits.
///
/// Labels: `tier` ("memory" | "database").
pub const CACHE_HITS_TOTAL: &str = "larder_cache_hits_total";

/// Total lookups that missed both tiers.
pub const CACHE_MISSES_TOTAL: &str = "larder_cache_misses_total";

/// Durable hits copied back into the in-process tier.
pub const CACHE_PROMOTIONS_TOTAL: &str = "larder_cache_promotions_total";

/// Durable store failures absorbed at the tier-2 boundary.
///
/// Labels: `operation`.
pub const STORE_ERRORS_TOTAL: &str = "larder_store_errors_total";

/// Total `store` calls.
///
/// Labels: `outcome`.
pub const STORES_TOTAL: &str = "larder_stores_total";

/// Hash matched but the stored signature string did not.
pub const SIGNATURE_COLLISIONS_TOTAL: &str = "larder_signature_collisions_total";

/// Deterministic fallbacks served.
///
/// Labels: `kind` ("template" | "placeholder").
pub const FALLBACKS_TOTAL: &str = "larder_fallbacks_total";

/// Requests answered by [`MealEngine::resolve`](crate::engine::MealEngine::resolve).
///
/// Labels: `origin`.
pub const RESOLUTIONS_TOTAL: &str = "larder_resolutions_total";
