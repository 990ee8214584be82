//! Meal template and match types.
//!
//! Templates are curated, read-only meal definitions supplied externally.
//! The matcher scores them against a request; see [`crate::matcher`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::MealSlot;

/// One ingredient of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateIngredient {
    /// Ingredient identifier, e.g. `"chicken_breast"` or `"Sweet Potato"`.
    /// Normalised the same way request ingredients are.
    pub ingredient_id: String,
    /// Quantity in grams.
    pub grams: f64,
}

/// A precomputed meal definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTemplate {
    pub id: String,
    pub slot: MealSlot,
    /// Display name. Derived from the ingredients when absent.
    #[serde(default)]
    pub name: Option<String>,
    pub ingredients: Vec<TemplateIngredient>,
    /// Ingredient id → default cooking method.
    #[serde(default)]
    pub default_methods: BTreeMap<String, String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Key into the [`ImageTable`](crate::catalog::ImageTable).
    #[serde(default)]
    pub image_key: Option<String>,
}

impl MealTemplate {
    /// Create a template from `(ingredient_id, grams)` pairs.
    pub fn new<I, S>(id: impl Into<String>, slot: MealSlot, ingredients: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            slot,
            name: None,
            ingredients: ingredients
                .into_iter()
                .map(|(id, grams)| TemplateIngredient {
                    ingredient_id: id.into(),
                    grams,
                })
                .collect(),
            default_methods: BTreeMap::new(),
            instructions: Vec::new(),
            image_key: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_method(mut self, ingredient: impl Into<String>, method: impl Into<String>) -> Self {
        self.default_methods.insert(ingredient.into(), method.into());
        self
    }

    pub fn with_instruction(mut self, step: impl Into<String>) -> Self {
        self.instructions.push(step.into());
        self
    }

    pub fn with_image_key(mut self, key: impl Into<String>) -> Self {
        self.image_key = Some(key.into());
        self
    }
}

/// How closely a template matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Identical ingredient sets (score 1).
    Exact,
    /// At least half overlap (score ≥ 0.5).
    Partial,
    /// Same slot, some overlap.
    Category,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Partial => "partial",
            MatchType::Category => "category",
        }
    }

    /// Classify a similarity score.
    pub fn from_score(score: f64) -> Self {
        if score >= 1.0 {
            MatchType::Exact
        } else if score >= 0.5 {
            MatchType::Partial
        } else {
            MatchType::Category
        }
    }
}

/// A scored template.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub template: &'a MealTemplate,
    /// Similarity in `[0, 1]`.
    pub score: f64,
    pub match_type: MatchType,
}
