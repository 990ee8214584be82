//! Signature request type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::MealSlot;

/// A logical meal request: which ingredients, for which slot, cooked how.
///
/// Ingredient order is irrelevant; the signature builder canonicalises it.
/// An empty ingredient list is accepted and yields a low-specificity
/// signature rather than an error.
///
/// ```rust
/// # use larder::{MealSlot, SignatureInput};
/// let input = SignatureInput::new(MealSlot::Dinner, ["Chicken Breast", "Rice"])
///     .with_method("chicken breast", "grilled");
/// assert_eq!(input.ingredients.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInput {
    /// Raw ingredient names, in any order.
    pub ingredients: Vec<String>,
    /// Requested meal slot.
    pub slot: MealSlot,
    /// Optional ingredient → cooking method mapping.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub methods: BTreeMap<String, String>,
}

impl SignatureInput {
    /// Create a request without cooking methods.
    pub fn new<I, S>(slot: MealSlot, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            slot,
            methods: BTreeMap::new(),
        }
    }

    /// Attach a cooking method for one ingredient.
    pub fn with_method(mut self, ingredient: impl Into<String>, method: impl Into<String>) -> Self {
        self.methods.insert(ingredient.into(), method.into());
        self
    }
}
