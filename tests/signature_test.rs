//! Tests for signature construction and hashing.

use std::collections::BTreeMap;

use larder::signature::{build_signature, normalize, signature_hash, template_signature};
use larder::{MealSlot, MealTemplate, SignatureInput};

/// Every permutation of `items` (small inputs only).
fn permutations(items: &[&str]) -> Vec<Vec<String>> {
    if items.len() <= 1 {
        return vec![items.iter().map(|s| s.to_string()).collect()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest: Vec<&str> = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.to_string());
            out.push(tail);
        }
    }
    out
}

// =========================================================================
// Order independence
// =========================================================================

#[test]
fn every_ingredient_permutation_gives_same_signature() {
    let items = ["Chicken Breast", "Broccoli", "Rice", "fresh Garlic"];
    let expected = build_signature(&SignatureInput::new(MealSlot::Dinner, items));

    let perms = permutations(&items);
    assert_eq!(perms.len(), 24);
    for perm in perms {
        let sig = build_signature(&SignatureInput::new(MealSlot::Dinner, perm.clone()));
        assert_eq!(sig, expected, "permutation {perm:?} diverged");
    }
}

#[test]
fn method_key_order_is_irrelevant() {
    let mut a = SignatureInput::new(MealSlot::Lunch, ["tofu", "noodles", "bok choy"]);
    a.methods = BTreeMap::from([
        ("tofu".to_string(), "fried".to_string()),
        ("bok choy".to_string(), "steamed".to_string()),
    ]);

    // Keys differ only in case/spacing, inserted in reverse order
    let b = SignatureInput::new(MealSlot::Lunch, ["Bok Choy", "Noodles", "Tofu"])
        .with_method("Bok  Choy", "Steamed")
        .with_method("Tofu", "fried");

    assert_eq!(build_signature(&a).as_str(), build_signature(&b).as_str());
    assert_eq!(
        build_signature(&a).as_str(),
        "lunch|bok_choy+noodles+tofu|bok_choy:steamed+tofu:fried"
    );
}

#[test]
fn reference_request_signature() {
    for order in permutations(&["Chicken Breast", "Broccoli", "Rice"]) {
        let input = SignatureInput::new(MealSlot::Dinner, order);
        assert_eq!(
            build_signature(&input).as_str(),
            "dinner|broccoli+chicken_breast+rice"
        );
    }
}

// =========================================================================
// Distinctness
// =========================================================================

#[test]
fn slot_is_part_of_signature() {
    let lunch = build_signature(&SignatureInput::new(MealSlot::Lunch, ["eggs"]));
    let dinner = build_signature(&SignatureInput::new(MealSlot::Dinner, ["eggs"]));
    assert_ne!(lunch, dinner);
}

#[test]
fn methods_distinguish_signatures() {
    let plain = build_signature(&SignatureInput::new(MealSlot::Dinner, ["salmon"]));
    let grilled = build_signature(
        &SignatureInput::new(MealSlot::Dinner, ["salmon"]).with_method("salmon", "grilled"),
    );
    assert_ne!(plain.as_str(), grilled.as_str());
    assert_ne!(plain.hash_key(), grilled.hash_key());
}

#[test]
fn modifiers_do_not_distinguish_signatures() {
    let a = build_signature(&SignatureInput::new(MealSlot::Snack, ["Organic Apple"]));
    let b = build_signature(&SignatureInput::new(MealSlot::Snack, ["apple"]));
    assert_eq!(a, b);
}

#[test]
fn separator_inside_a_name_does_not_alias_two_ingredients() {
    let joined = build_signature(&SignatureInput::new(MealSlot::Dinner, ["pepper+salt"]));
    let split = build_signature(&SignatureInput::new(MealSlot::Dinner, ["pepper", "salt"]));

    assert_eq!(joined.as_str(), "dinner|pepper_salt");
    assert_eq!(split.as_str(), "dinner|pepper+salt");
    assert_ne!(joined, split);
}

#[test]
fn segment_separators_cannot_forge_a_methods_segment() {
    let forged = build_signature(&SignatureInput::new(MealSlot::Lunch, ["salmon|salmon:grilled"]));
    let real = build_signature(
        &SignatureInput::new(MealSlot::Lunch, ["salmon"]).with_method("salmon", "grilled"),
    );
    assert_ne!(forged.as_str(), real.as_str());
    assert_eq!(forged.ingredients(), ["salmon_salmon_grilled"]);
}

// =========================================================================
// Normalisation
// =========================================================================

#[test]
fn normalize_is_idempotent_over_a_corpus() {
    let corpus = [
        "Chicken Breast",
        "  extra   virgin olive oil ",
        "FROZEN peas",
        "fresh_organic_kale",
        "cooked",
        "",
        "Jalapeño",
    ];
    for raw in corpus {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }
}

// =========================================================================
// Templates
// =========================================================================

#[test]
fn template_signature_matches_equivalent_request() {
    let template = MealTemplate::new(
        "t1",
        MealSlot::Dinner,
        [("chicken_breast", 150.0), ("rice", 120.0), ("broccoli", 80.0)],
    );
    let request = SignatureInput::new(MealSlot::Dinner, ["Rice", "Broccoli", "Chicken Breast"]);
    assert_eq!(template_signature(&template), build_signature(&request));
}

// =========================================================================
// Hash
// =========================================================================

#[test]
fn hash_is_stable_for_reference_signature() {
    let sig = "dinner|broccoli+chicken_breast+rice";
    let first = signature_hash(sig);
    for _ in 0..10 {
        assert_eq!(signature_hash(sig), first);
    }
}

#[test]
fn hash_key_agrees_with_free_function() {
    let sig = build_signature(&SignatureInput::new(MealSlot::Breakfast, ["oats", "banana"]));
    assert_eq!(sig.hash_key(), signature_hash(sig.as_str()));
}
