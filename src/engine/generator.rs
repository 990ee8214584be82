//! Seam for the external meal-generation step.
//!
//! Generation is expensive and lives outside this crate. The engine only
//! calls it after both cache tiers and the template catalog failed to
//! answer a request with confidence.
//!
//! # Failure semantics
//!
//! Any `Err` (or an empty meal list) makes
//! [`MealEngine::resolve`](super::MealEngine::resolve) fall through to a
//! template-backed meal; generator failures never reach the caller.

use async_trait::async_trait;

use crate::Result;
use crate::signature::Signature;
use crate::types::{Meal, SignatureInput};

/// Produces new meals for a request the caches could not answer.
#[async_trait]
pub trait MealGenerator: Send + Sync {
    /// Generator name for logging/debugging.
    fn name(&self) -> &str;

    /// Generate meals for `input`.
    ///
    /// `signature` is the canonical form of `input`, passed so generators
    /// can log or key on it without rebuilding it.
    async fn generate(&self, input: &SignatureInput, signature: &Signature) -> Result<Vec<Meal>>;
}
