//! Template matching and deterministic fallback.
//!
//! [`TemplateMatcher`] answers "is there a curated meal close to this
//! request?" without calling the generation step:
//!
//! - [`find_matches`](TemplateMatcher::find_matches) scores every template
//!   in the request's slot by ingredient-set overlap:
//!   `|A ∩ B| / max(|A|, |B|)`, 0 when either set is empty.
//! - [`deterministic_fallback`](TemplateMatcher::deterministic_fallback)
//!   always produces a meal. It picks a template by hashing the sorted
//!   request ingredients, or synthesises a placeholder when the slot has
//!   no templates. No randomness is involved, so a request maps to the
//!   same meal every time.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::catalog::{ImageTable, TemplateCatalog};
use crate::signature::{self, Signature, build_signature, template_signature};
use crate::telemetry;
use crate::types::{
    Macros, MatchResult, MatchType, Meal, MealIngredient, MealSlot, MealTemplate, SignatureInput,
};

/// Macro estimate for meals whose nutrition is not known here.
pub const DEFAULT_MACROS: Macros = Macros {
    calories: 450.0,
    protein: 25.0,
    carbs: 45.0,
    fat: 15.0,
};

/// Quantity assigned to each ingredient of a synthesised placeholder.
const PLACEHOLDER_GRAMS: f64 = 100.0;

/// Matcher tuning.
///
/// ```rust
/// # use larder::MatcherConfig;
/// let config = MatcherConfig::new().max_results(5).accept_score(0.75);
/// assert_eq!(config.max_results, 5);
/// ```
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Default number of matches returned. Default: 3.
    pub max_results: usize,
    /// Minimum score for a template to answer a request before generation
    /// is attempted. Default: 1.0 (exact matches only).
    pub accept_score: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_results: 3,
            accept_score: 1.0,
        }
    }
}

impl MatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    /// Clamped to `[0, 1]`.
    pub fn accept_score(mut self, score: f64) -> Self {
        self.accept_score = score.clamp(0.0, 1.0);
        self
    }
}

/// Set-overlap similarity in `[0, 1]`.
pub fn similarity(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f64 {
    let larger = a.len().max(b.len());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    a.intersection(b).count() as f64 / larger as f64
}

/// Scores templates against requests and maps them to meals.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    catalog: Arc<TemplateCatalog>,
    images: Arc<ImageTable>,
    config: MatcherConfig,
}

impl TemplateMatcher {
    pub fn new(catalog: Arc<TemplateCatalog>, images: Arc<ImageTable>, config: MatcherConfig) -> Self {
        Self {
            catalog,
            images,
            config,
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn images(&self) -> &ImageTable {
        &self.images
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Top `max_results` templates for `input`, best first.
    ///
    /// Zero-score templates are dropped; ties keep catalog order.
    pub fn find_matches(&self, input: &SignatureInput, max_results: usize) -> Vec<MatchResult<'_>> {
        self.find_matches_for(&build_signature(input), max_results)
    }

    /// [`find_matches`](Self::find_matches) for an already-built signature.
    pub fn find_matches_for(&self, signature: &Signature, max_results: usize) -> Vec<MatchResult<'_>> {
        let requested = signature.ingredient_set();

        let mut matches: Vec<MatchResult<'_>> = self
            .catalog
            .for_slot(signature.slot())
            .iter()
            .filter_map(|template| {
                let candidate = template_signature(template);
                let score = similarity(&requested, &candidate.ingredient_set());
                (score > 0.0).then(|| MatchResult {
                    template,
                    score,
                    match_type: MatchType::from_score(score),
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(max_results);
        matches
    }

    /// Best template scoring at least `min_score`, if any.
    pub fn best_match(&self, signature: &Signature, min_score: f64) -> Option<MatchResult<'_>> {
        self.find_matches_for(signature, 1)
            .into_iter()
            .find(|m| m.score >= min_score)
    }

    /// The template [`deterministic_fallback`](Self::deterministic_fallback)
    /// would pick, or `None` when the slot has no templates.
    pub fn fallback_template<S: AsRef<str>>(
        &self,
        slot: MealSlot,
        ingredients: &[S],
    ) -> Option<&MealTemplate> {
        let templates = self.catalog.for_slot(slot);
        if templates.is_empty() {
            return None;
        }
        let key = fallback_key(ingredients);
        let index = signature::rolling_hash(&key) as usize % templates.len();
        templates.get(index)
    }

    /// A meal for `slot`, chosen without randomness.
    ///
    /// Permutations of the same ingredients yield the same meal. Never
    /// fails: an empty slot catalog produces a placeholder built from the
    /// requested ingredients.
    pub fn deterministic_fallback<S: AsRef<str>>(&self, slot: MealSlot, ingredients: &[S]) -> Meal {
        if let Some(template) = self.fallback_template(slot, ingredients) {
            debug!(%slot, template = %template.id, "deterministic template fallback");
            metrics::counter!(telemetry::FALLBACKS_TOTAL, "kind" => "template").increment(1);
            return self.to_meal(template, None, None);
        }

        debug!(%slot, "no templates for slot, synthesising placeholder");
        metrics::counter!(telemetry::FALLBACKS_TOTAL, "kind" => "placeholder").increment(1);
        self.placeholder(slot, ingredients)
    }

    fn placeholder<S: AsRef<str>>(&self, slot: MealSlot, ingredients: &[S]) -> Meal {
        let names = normalized_sorted(ingredients);
        let key = names.join("+");

        let titled: Vec<String> = names.iter().map(|n| display_name(n)).collect();
        let name = if titled.is_empty() {
            format!("Simple {}", capitalize(slot.as_str()))
        } else {
            format!("{} {}", titled.join(" & "), capitalize(slot.as_str()))
        };

        Meal {
            id: format!("placeholder-{slot}-{}", signature::signature_hash(&key)),
            name,
            slot,
            ingredients: titled
                .into_iter()
                .map(|name| MealIngredient {
                    name,
                    grams: PLACEHOLDER_GRAMS,
                })
                .collect(),
            instructions: vec![
                "Prepare and portion the ingredients.".to_string(),
                "Cook to preference and serve.".to_string(),
            ],
            image_url: Some(self.images.resolve(None, slot).to_string()),
            macros: DEFAULT_MACROS,
        }
    }

    /// Map a template to the external meal shape.
    ///
    /// `index` is appended to the id (`"{id}-{index}"`) and should only be
    /// set when the template appears more than once in one response; see
    /// [`to_meals`](Self::to_meals). Without `macros`, [`DEFAULT_MACROS`]
    /// is used.
    pub fn to_meal(&self, template: &MealTemplate, macros: Option<Macros>, index: Option<usize>) -> Meal {
        let id = match index {
            Some(i) => format!("{}-{i}", template.id),
            None => template.id.clone(),
        };

        let name = template.name.clone().unwrap_or_else(|| {
            let parts: Vec<String> = template
                .ingredients
                .iter()
                .map(|i| display_name(&signature::normalize(&i.ingredient_id)))
                .filter(|n| !n.is_empty())
                .collect();
            parts.join(" & ")
        });

        let instructions = if template.instructions.is_empty() {
            template
                .default_methods
                .iter()
                .map(|(ingredient, method)| {
                    format!(
                        "{} the {}.",
                        capitalize(method),
                        display_name(&signature::normalize(ingredient)).to_lowercase()
                    )
                })
                .collect()
        } else {
            template.instructions.clone()
        };

        Meal {
            id,
            name,
            slot: template.slot,
            ingredients: template
                .ingredients
                .iter()
                .map(|i| MealIngredient {
                    name: display_name(&signature::normalize(&i.ingredient_id)),
                    grams: i.grams,
                })
                .collect(),
            instructions,
            image_url: Some(
                self.images
                    .resolve(template.image_key.as_deref(), template.slot)
                    .to_string(),
            ),
            macros: macros.unwrap_or(DEFAULT_MACROS),
        }
    }

    /// Map several templates for one response, suffixing ids only for
    /// templates that repeat.
    pub fn to_meals(&self, templates: &[&MealTemplate]) -> Vec<Meal> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for template in templates {
            *counts.entry(template.id.as_str()).or_default() += 1;
        }
        templates
            .iter()
            .enumerate()
            .map(|(i, template)| {
                let repeated = counts.get(template.id.as_str()).copied().unwrap_or(0) > 1;
                self.to_meal(template, None, repeated.then_some(i))
            })
            .collect()
    }
}

/// Normalised, non-empty ingredient names, sorted.
fn normalized_sorted<S: AsRef<str>>(ingredients: &[S]) -> Vec<String> {
    let mut names: Vec<String> = ingredients
        .iter()
        .map(|i| signature::normalize(i.as_ref()))
        .filter(|n| !n.is_empty())
        .collect();
    names.sort();
    names
}

fn fallback_key<S: AsRef<str>>(ingredients: &[S]) -> String {
    normalized_sorted(ingredients).join("+")
}

/// `"chicken_breast"` → `"Chicken Breast"`.
fn display_name(normalized: &str) -> String {
    normalized
        .split('_')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
