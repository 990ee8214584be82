//! Ingredient signatures and their storage keys.
//!
//! A signature is the canonical, order-independent encoding of a meal
//! request:
//!
//! ```text
//! slot|ingredient+ingredient[|ingredient:method+ingredient:method]
//! ```
//!
//! Ingredients are normalised with [`normalize`], empties dropped, then
//! sorted. Method entries are keyed by normalised ingredient and sorted by
//! key. The methods segment is omitted when no methods remain.
//!
//! [`signature_hash`] folds a signature into a short base-36 key. It is a
//! 32-bit polynomial rolling hash: stable across processes, cheap, and
//! **not** collision-free. It must never be used as a security primitive.
//!
//! ```rust
//! # use larder::{MealSlot, SignatureInput};
//! # use larder::signature::build_signature;
//! let input = SignatureInput::new(MealSlot::Dinner, ["Rice", "Chicken Breast", "Broccoli"]);
//! assert_eq!(build_signature(&input).as_str(), "dinner|broccoli+chicken_breast+rice");
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::types::{MealSlot, MealTemplate, SignatureInput};

/// Modifier words stripped from either end of an ingredient name.
const MODIFIERS: &[&str] = &["fresh", "organic", "raw", "cooked", "frozen"];

/// Separator between words of one ingredient.
const WORD_SEP: &str = "_";
/// Separator between ingredients (and between method entries).
const ITEM_SEP: &str = "+";
/// Separator between signature segments.
const SEGMENT_SEP: &str = "|";

/// Characters with structural meaning in a signature. Inside a name they
/// split words, so `"pepper+salt"` cannot alias `["pepper", "salt"]`.
const RESERVED: &[char] = &['+', '|', ':'];

fn is_word_break(c: char) -> bool {
    c.is_whitespace() || c == '_' || RESERVED.contains(&c)
}

/// Normalise one ingredient name.
///
/// Lowercases, splits on whitespace, underscores and the signature
/// separators (`+`, `|`, `:`), strips leading and trailing [`MODIFIERS`],
/// and joins the remaining words with `_`.
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(ingredient: &str) -> String {
    let lower = ingredient.to_lowercase();
    let mut words: Vec<&str> = lower
        .split(is_word_break)
        .filter(|w| !w.is_empty())
        .collect();

    while words.first().is_some_and(|w| MODIFIERS.contains(w)) {
        words.remove(0);
    }
    while words.last().is_some_and(|w| MODIFIERS.contains(w)) {
        words.pop();
    }

    words.join(WORD_SEP)
}

/// Normalise a cooking method. Unlike ingredients, modifiers are kept
/// ("raw" is a legitimate method).
fn normalize_method(method: &str) -> String {
    method
        .to_lowercase()
        .split(is_word_break)
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(WORD_SEP)
}

/// A canonical request signature.
///
/// Holds the rendered string alongside its parsed parts so the matcher can
/// compare ingredient sets without re-parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    slot: MealSlot,
    ingredients: Vec<String>,
    methods: Vec<(String, String)>,
    text: String,
}

impl Signature {
    /// Build a signature from raw parts. Ordering of either iterator is
    /// irrelevant.
    pub fn from_parts<'a, I, M>(slot: MealSlot, ingredients: I, methods: M) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        M: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut ingredients: Vec<String> = ingredients
            .into_iter()
            .map(normalize)
            .filter(|s| !s.is_empty())
            .collect();
        ingredients.sort();

        let mut methods: Vec<(String, String)> = methods
            .into_iter()
            .map(|(k, v)| (normalize(k), normalize_method(v)))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .collect();
        methods.sort();
        // Two raw keys may normalise to the same ingredient.
        methods.dedup_by(|a, b| a.0 == b.0);

        let mut text = format!(
            "{}{SEGMENT_SEP}{}",
            slot.as_str(),
            ingredients.join(ITEM_SEP)
        );
        if !methods.is_empty() {
            let rendered: Vec<String> = methods.iter().map(|(k, v)| format!("{k}:{v}")).collect();
            text.push_str(SEGMENT_SEP);
            text.push_str(&rendered.join(ITEM_SEP));
        }

        Self {
            slot,
            ingredients,
            methods,
            text,
        }
    }

    /// Meal slot this signature was built for.
    pub fn slot(&self) -> MealSlot {
        self.slot
    }

    /// Normalised ingredients, sorted, duplicates kept.
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    /// Normalised `(ingredient, method)` pairs, sorted by ingredient.
    pub fn methods(&self) -> &[(String, String)] {
        &self.methods
    }

    /// Distinct normalised ingredients.
    pub fn ingredient_set(&self) -> BTreeSet<&str> {
        self.ingredients.iter().map(String::as_str).collect()
    }

    /// The canonical string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Storage key for this signature. See [`signature_hash`].
    pub fn hash_key(&self) -> String {
        signature_hash(&self.text)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build the canonical signature for a request.
///
/// An empty ingredient list produces the degenerate `slot|` signature.
pub fn build_signature(input: &SignatureInput) -> Signature {
    Signature::from_parts(
        input.slot,
        input.ingredients.iter().map(String::as_str),
        input.methods.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )
}

/// Build the signature a template would have if it were requested.
pub fn template_signature(template: &MealTemplate) -> Signature {
    Signature::from_parts(
        template.slot,
        template.ingredients.iter().map(|i| i.ingredient_id.as_str()),
        template
            .default_methods
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    )
}

/// 32-bit polynomial rolling hash (`h = h * 31 + c`, wrapping).
pub fn rolling_hash(input: &str) -> u32 {
    let mut h: i32 = 0;
    for c in input.chars() {
        h = h.wrapping_mul(31).wrapping_add(c as i32);
    }
    h.unsigned_abs()
}

/// Fold a signature into a compact base-36 storage key.
///
/// Deterministic across calls and process restarts. Distinct signatures
/// can collide; the durable row keeps the full signature for that reason.
pub fn signature_hash(signature: &str) -> String {
    to_base36(rolling_hash(signature))
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    // Only ASCII digits were pushed.
    out.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_joins_words() {
        assert_eq!(normalize("Chicken Breast"), "chicken_breast");
        assert_eq!(normalize("  Sweet   Potato "), "sweet_potato");
    }

    #[test]
    fn normalize_strips_modifiers_at_either_end() {
        assert_eq!(normalize("Fresh Basil"), "basil");
        assert_eq!(normalize("organic raw spinach"), "spinach");
        assert_eq!(normalize("peas frozen"), "peas");
        // Only ends are stripped
        assert_eq!(normalize("slow cooked beef"), "slow_cooked_beef");
    }

    #[test]
    fn normalize_splits_on_signature_separators() {
        assert_eq!(normalize("pepper+salt"), "pepper_salt");
        assert_eq!(normalize("a|b:c"), "a_b_c");
        assert_eq!(normalize("+"), "");
    }

    #[test]
    fn method_separators_are_neutralised() {
        let input =
            SignatureInput::new(MealSlot::Dinner, ["tofu"]).with_method("tofu", "fried+glazed");
        assert_eq!(
            build_signature(&input).as_str(),
            "dinner|tofu|tofu:fried_glazed"
        );
    }

    #[test]
    fn normalize_all_modifiers_is_empty() {
        assert_eq!(normalize("fresh organic"), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "Chicken Breast",
            "fresh_basil",
            "Frozen  Mixed Vegetables",
            "slow cooked beef",
            "raw",
            "Crème Fraîche",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn signature_for_reference_request() {
        let input = SignatureInput::new(MealSlot::Dinner, ["Chicken Breast", "Broccoli", "Rice"]);
        assert_eq!(
            build_signature(&input).as_str(),
            "dinner|broccoli+chicken_breast+rice"
        );
    }

    #[test]
    fn signature_includes_sorted_methods() {
        let input = SignatureInput::new(MealSlot::Lunch, ["salmon", "asparagus"])
            .with_method("Salmon", "Pan Seared")
            .with_method("asparagus", "roasted");
        assert_eq!(
            build_signature(&input).as_str(),
            "lunch|asparagus+salmon|asparagus:roasted+salmon:pan_seared"
        );
    }

    #[test]
    fn signature_drops_empty_ingredients() {
        let input = SignatureInput::new(MealSlot::Snack, ["", "fresh", "Apple"]);
        assert_eq!(build_signature(&input).as_str(), "snack|apple");
    }

    #[test]
    fn empty_request_is_degenerate_but_valid() {
        let input = SignatureInput::new(MealSlot::Breakfast, Vec::<String>::new());
        let sig = build_signature(&input);
        assert_eq!(sig.as_str(), "breakfast|");
        assert!(sig.ingredient_set().is_empty());
    }

    #[test]
    fn duplicates_are_kept_in_signature_but_not_in_set() {
        let input = SignatureInput::new(MealSlot::Dinner, ["egg", "Egg", "toast"]);
        let sig = build_signature(&input);
        assert_eq!(sig.as_str(), "dinner|egg+egg+toast");
        assert_eq!(sig.ingredient_set().len(), 2);
    }

    #[test]
    fn hash_known_values() {
        assert_eq!(signature_hash(""), "0");
        // 'a' = 97 = 2*36 + 25
        assert_eq!(signature_hash("a"), "2p");
        // 97*31 + 98 = 3105
        assert_eq!(signature_hash("ab"), "2e9");
    }

    #[test]
    fn hash_is_stable() {
        let sig = "dinner|broccoli+chicken_breast+rice";
        assert_eq!(signature_hash(sig), signature_hash(sig));
        assert!(
            signature_hash(sig)
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn hash_handles_overflowing_input() {
        let long = "x".repeat(10_000);
        let key = signature_hash(&long);
        assert!(!key.is_empty());
        // u32::MAX in base 36 is 7 digits
        assert!(key.len() <= 7);
    }
}
