//! The engine facade callers use.
//!
//! [`MealEngine`] owns one [`DurableCache`] and one [`TemplateMatcher`]
//! and is built once at startup via [`MealEngine::builder`], then shared
//! by reference (or `Arc`) across request handlers.
//!
//! Callers that drive generation themselves use the primitive operations:
//!
//! 1. [`lookup`](MealEngine::lookup): tier 1, then tier 2. `None` means miss.
//! 2. on a miss, generate meals outside the engine;
//! 3. [`store`](MealEngine::store) them so both tiers are populated.
//!
//! Callers that register a [`MealGenerator`] can use
//! [`resolve`](MealEngine::resolve), which always yields meals.
//!
//! Concurrent misses for one signature are not coalesced; each caller may
//! generate independently and the first durable writer wins.

mod builder;
mod generator;

pub use builder::MealEngineBuilder;
pub use generator::MealGenerator;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheHit, DurableCache, HitTier, StoreOutcome};
use crate::matcher::TemplateMatcher;
use crate::signature::{Signature, build_signature};
use crate::telemetry;
use crate::types::{MatchResult, Meal, MealSlot, ResultSource, SignatureInput};

/// Minimum score for a template to stand in for failed generation.
const DEGRADED_MATCH_SCORE: f64 = 0.5;

/// Where a [`Resolution`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Tier-1 cache hit.
    Memory,
    /// Tier-2 cache hit (now promoted).
    Database,
    /// Template matched by ingredient similarity.
    Template,
    /// Fresh output of the configured generator.
    Generated,
    /// Deterministic fallback.
    Fallback,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Memory => "memory",
            Origin::Database => "database",
            Origin::Template => "template",
            Origin::Generated => "generated",
            Origin::Fallback => "fallback",
        }
    }
}

impl From<HitTier> for Origin {
    fn from(tier: HitTier) -> Self {
        match tier {
            HitTier::Memory => Origin::Memory,
            HitTier::Database => Origin::Database,
        }
    }
}

/// Meals answering one request.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub meals: Vec<Meal>,
    pub origin: Origin,
    pub signature: Signature,
}

/// Signature cache + template matcher facade.
pub struct MealEngine {
    cache: DurableCache,
    matcher: TemplateMatcher,
    generator: Option<Arc<dyn MealGenerator>>,
}

impl MealEngine {
    /// Create a new builder for configuring the engine.
    pub fn builder() -> MealEngineBuilder {
        MealEngineBuilder::new()
    }

    pub(crate) fn new(
        cache: DurableCache,
        matcher: TemplateMatcher,
        generator: Option<Arc<dyn MealGenerator>>,
    ) -> Self {
        Self {
            cache,
            matcher,
            generator,
        }
    }

    pub fn cache(&self) -> &DurableCache {
        &self.cache
    }

    pub fn matcher(&self) -> &TemplateMatcher {
        &self.matcher
    }

    /// Canonical signature for `input`.
    pub fn signature(&self, input: &SignatureInput) -> Signature {
        build_signature(input)
    }

    /// Check both cache tiers. `None` is a miss; the caller should
    /// generate and then [`store`](Self::store).
    pub async fn lookup(&self, input: &SignatureInput) -> Option<CacheHit> {
        self.cache.lookup(&build_signature(input)).await
    }

    /// Populate both tiers with caller-produced meals.
    pub async fn store(
        &self,
        input: &SignatureInput,
        meals: Vec<Meal>,
        source: ResultSource,
    ) -> StoreOutcome {
        self.cache.store(&build_signature(input), meals, source).await
    }

    /// Templates similar to `input`, best first.
    pub fn find_matches(&self, input: &SignatureInput, max_results: usize) -> Vec<MatchResult<'_>> {
        self.matcher.find_matches(input, max_results)
    }

    /// A reproducible meal for `slot`; never fails.
    pub fn deterministic_fallback<S: AsRef<str>>(&self, slot: MealSlot, ingredients: &[S]) -> Meal {
        self.matcher.deterministic_fallback(slot, ingredients)
    }

    /// Answer `input` with meals, whatever is unavailable.
    ///
    /// Order: cache → template at or above `accept_score` → generator →
    /// template at or above 0.5 → deterministic fallback. Cached and
    /// confidently matched or generated meals are stored; degraded answers
    /// are not, so a later generator run can still fill the signature.
    pub async fn resolve(&self, input: &SignatureInput) -> Resolution {
        let signature = build_signature(input);
        let resolution = self.resolve_signature(input, signature).await;
        metrics::counter!(telemetry::RESOLUTIONS_TOTAL, "origin" => resolution.origin.as_str())
            .increment(1);
        resolution
    }

    async fn resolve_signature(&self, input: &SignatureInput, signature: Signature) -> Resolution {
        if let Some(hit) = self.cache.lookup(&signature).await {
            return Resolution {
                meals: hit.meals,
                origin: hit.tier.into(),
                signature,
            };
        }

        let accept = self.matcher.config().accept_score;
        if let Some(found) = self.matcher.best_match(&signature, accept) {
            debug!(template = %found.template.id, score = found.score, "template accepted before generation");
            let meals = self.matcher.to_meals(&[found.template]);
            self.cache
                .store(&signature, meals.clone(), ResultSource::Template)
                .await;
            return Resolution {
                meals,
                origin: Origin::Template,
                signature,
            };
        }

        if let Some(generator) = &self.generator {
            match generator.generate(input, &signature).await {
                Ok(meals) if !meals.is_empty() => {
                    self.cache
                        .store(&signature, meals.clone(), ResultSource::Ai)
                        .await;
                    return Resolution {
                        meals,
                        origin: Origin::Generated,
                        signature,
                    };
                }
                Ok(_) => {
                    warn!(generator = generator.name(), signature = %signature, "generator returned no meals");
                }
                Err(e) => {
                    warn!(generator = generator.name(), signature = %signature, error = %e, "generation failed");
                }
            }
        }

        if let Some(found) = self.matcher.best_match(&signature, DEGRADED_MATCH_SCORE) {
            debug!(template = %found.template.id, score = found.score, "serving closest template");
            return Resolution {
                meals: self.matcher.to_meals(&[found.template]),
                origin: Origin::Template,
                signature,
            };
        }

        let meal = self
            .matcher
            .deterministic_fallback(signature.slot(), signature.ingredients());
        Resolution {
            meals: vec![meal],
            origin: Origin::Fallback,
            signature,
        }
    }
}
