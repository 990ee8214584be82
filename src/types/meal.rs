//! Meal payload types.
//!
//! The externally consumed meal shape. Caches store and return these
//! verbatim; this crate never inspects their nutritional content beyond
//! copying the first meal's macros into the durable row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::MealSlot;
use crate::LarderError;

/// Macro-nutrient snapshot for one meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Macros {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Whether every field is a finite number. JSON has no encoding for
    /// NaN or infinity.
    pub fn is_finite(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// One ingredient line of a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealIngredient {
    pub name: String,
    /// Quantity in grams.
    pub grams: f64,
}

/// A plannable meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Identifier, unique within a single response.
    pub id: String,
    pub name: String,
    pub slot: MealSlot,
    pub ingredients: Vec<MealIngredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Displayable image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    pub macros: Macros,
}

impl Meal {
    /// Whether the macros and every ingredient quantity are finite.
    pub fn is_finite(&self) -> bool {
        self.macros.is_finite() && self.ingredients.iter().all(|i| i.grams.is_finite())
    }
}

/// Where a cached meal payload originally came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Produced by the external generation step.
    Ai,
    /// Picked from the template catalog by deterministic fallback.
    Catalog,
    /// Matched against a template by ingredient similarity.
    Template,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Ai => "ai",
            ResultSource::Catalog => "catalog",
            ResultSource::Template => "template",
        }
    }
}

impl fmt::Display for ResultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultSource {
    type Err = LarderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai" => Ok(ResultSource::Ai),
            "catalog" => Ok(ResultSource::Catalog),
            "template" => Ok(ResultSource::Template),
            other => Err(LarderError::InvalidInput(format!(
                "unknown result source '{other}'"
            ))),
        }
    }
}
