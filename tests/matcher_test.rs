//! Tests for [`TemplateMatcher`] - similarity scoring, fallback, meal mapping.

use std::sync::Arc;

use larder::catalog::DEFAULT_IMAGE_URL;
use larder::matcher::DEFAULT_MACROS;
use larder::{
    ImageTable, Macros, MatchType, MatcherConfig, MealSlot, MealTemplate, SignatureInput,
    TemplateCatalog, TemplateMatcher,
};

// ============================================================================
// Fixtures
// ============================================================================

fn dinner_catalog() -> TemplateCatalog {
    TemplateCatalog::from_templates([
        MealTemplate::new(
            "sheet-pan-chicken",
            MealSlot::Dinner,
            [
                ("chicken_breast", 150.0),
                ("sweet_potato", 200.0),
                ("broccoli", 100.0),
            ],
        )
        .with_name("Sheet Pan Chicken")
        .with_method("chicken_breast", "roasted")
        .with_image_key("sheet-pan"),
        MealTemplate::new(
            "chicken-rice",
            MealSlot::Dinner,
            [("chicken_breast", 150.0), ("broccoli", 100.0), ("rice", 120.0)],
        ),
        MealTemplate::new(
            "salmon-bowl",
            MealSlot::Dinner,
            [("salmon", 140.0), ("rice", 120.0), ("avocado", 60.0)],
        ),
        MealTemplate::new(
            "tofu-stir-fry",
            MealSlot::Dinner,
            [("tofu", 150.0), ("bok_choy", 100.0), ("noodles", 120.0)],
        ),
        MealTemplate::new("oatmeal", MealSlot::Breakfast, [("oats", 60.0), ("banana", 100.0)]),
    ])
}

fn images() -> ImageTable {
    ImageTable::default()
        .with_image("sheet-pan", "/img/sheet-pan.jpg")
        .with_slot_default(MealSlot::Dinner, "/img/dinner.jpg")
}

fn matcher() -> TemplateMatcher {
    TemplateMatcher::new(
        Arc::new(dinner_catalog()),
        Arc::new(images()),
        MatcherConfig::default(),
    )
}

fn request(items: &[&str]) -> SignatureInput {
    SignatureInput::new(MealSlot::Dinner, items.iter().copied())
}

// ============================================================================
// find_matches
// ============================================================================

#[test]
fn exact_match_scores_one() {
    let m = matcher();
    let matches = m.find_matches(&request(&["Chicken Breast", "Sweet Potato", "Broccoli"]), 3);

    assert_eq!(matches[0].template.id, "sheet-pan-chicken");
    assert_eq!(matches[0].score, 1.0);
    assert_eq!(matches[0].match_type, MatchType::Exact);
}

#[test]
fn two_of_three_is_partial() {
    let m = matcher();
    let matches = m.find_matches(&request(&["Chicken Breast", "Sweet Potato", "Broccoli"]), 3);

    let partial = matches
        .iter()
        .find(|r| r.template.id == "chicken-rice")
        .expect("chicken-rice shares two ingredients");
    assert!((0.5..=0.67).contains(&partial.score), "score {}", partial.score);
    assert_eq!(partial.match_type, MatchType::Partial);
}

#[test]
fn results_sorted_descending_and_zero_scores_dropped() {
    let m = matcher();
    let matches = m.find_matches(&request(&["rice", "chicken breast"]), 10);

    let ids: Vec<&str> = matches.iter().map(|r| r.template.id.as_str()).collect();
    assert!(!ids.contains(&"tofu-stir-fry"));
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(matches.iter().all(|r| r.score > 0.0 && r.score <= 1.0));
}

#[test]
fn low_overlap_is_category() {
    let m = matcher();
    let matches = m.find_matches(&request(&["salmon", "quinoa", "kale", "lemon"]), 3);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].template.id, "salmon-bowl");
    assert_eq!(matches[0].match_type, MatchType::Category);
}

#[test]
fn max_results_truncates() {
    let m = matcher();
    let matches = m.find_matches(&request(&["rice", "chicken breast", "broccoli"]), 1);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].template.id, "chicken-rice");
}

#[test]
fn only_requested_slot_is_considered() {
    let m = matcher();
    let input = SignatureInput::new(MealSlot::Lunch, ["oats", "banana"]);
    assert!(m.find_matches(&input, 3).is_empty());
}

#[test]
fn empty_request_matches_nothing() {
    let m = matcher();
    assert!(m.find_matches(&request(&[]), 3).is_empty());
}

// ============================================================================
// deterministic_fallback
// ============================================================================

#[test]
fn fallback_is_repeatable() {
    let m = matcher();
    let a = m.deterministic_fallback(MealSlot::Dinner, &["kale", "lentils"]);
    let b = m.deterministic_fallback(MealSlot::Dinner, &["kale", "lentils"]);
    assert_eq!(a.id, b.id);
}

#[test]
fn fallback_ignores_ingredient_order() {
    let m = matcher();
    let a = m.deterministic_fallback(MealSlot::Dinner, &["kale", "lentils", "Fresh Garlic"]);
    let b = m.deterministic_fallback(MealSlot::Dinner, &["garlic", "Lentils", "kale"]);
    assert_eq!(a.id, b.id);
}

#[test]
fn fallback_picks_from_slot_catalog() {
    let m = matcher();
    let meal = m.deterministic_fallback(MealSlot::Breakfast, &["anything"]);
    assert_eq!(meal.id, "oatmeal");
    assert_eq!(meal.slot, MealSlot::Breakfast);
}

#[test]
fn fallback_index_is_hash_modulo_catalog_length() {
    let m = matcher();
    let key = "kale+lentils";
    let expected = larder::signature::rolling_hash(key) as usize % 4;
    let template = m
        .fallback_template(MealSlot::Dinner, &["lentils", "kale"])
        .unwrap();
    assert_eq!(template.id, dinner_catalog().for_slot(MealSlot::Dinner)[expected].id);
}

#[test]
fn empty_slot_synthesises_placeholder() {
    let m = matcher();
    let meal = m.deterministic_fallback(MealSlot::Snack, &["Greek Yogurt", "honey"]);

    assert!(meal.id.starts_with("placeholder-snack-"));
    assert_eq!(meal.name, "Greek Yogurt & Honey Snack");
    assert_eq!(meal.ingredients.len(), 2);
    assert_eq!(meal.macros, DEFAULT_MACROS);
    assert_eq!(meal.image_url.as_deref(), Some(DEFAULT_IMAGE_URL));

    let again = m.deterministic_fallback(MealSlot::Snack, &["honey", "greek yogurt"]);
    assert_eq!(meal.id, again.id);
}

#[test]
fn empty_catalog_and_empty_request_still_produce_a_meal() {
    let m = TemplateMatcher::new(
        Arc::new(TemplateCatalog::new()),
        Arc::new(ImageTable::default()),
        MatcherConfig::default(),
    );
    let meal = m.deterministic_fallback::<&str>(MealSlot::Lunch, &[]);
    assert_eq!(meal.name, "Simple Lunch");
    assert!(meal.ingredients.is_empty());
}

// ============================================================================
// to_meal / to_meals
// ============================================================================

#[test]
fn to_meal_resolves_specific_image() {
    let m = matcher();
    let template = m.catalog().get("sheet-pan-chicken").unwrap();
    let meal = m.to_meal(template, None, None);

    assert_eq!(meal.id, "sheet-pan-chicken");
    assert_eq!(meal.name, "Sheet Pan Chicken");
    assert_eq!(meal.image_url.as_deref(), Some("/img/sheet-pan.jpg"));
    assert_eq!(meal.ingredients[1].name, "Sweet Potato");
    assert_eq!(meal.ingredients[1].grams, 200.0);
    assert_eq!(meal.instructions, vec!["Roasted the chicken breast.".to_string()]);
}

#[test]
fn to_meal_falls_back_to_slot_then_global_image() {
    let m = matcher();
    let chicken_rice = m.catalog().get("chicken-rice").unwrap();
    assert_eq!(
        m.to_meal(chicken_rice, None, None).image_url.as_deref(),
        Some("/img/dinner.jpg")
    );

    let oatmeal = m.catalog().get("oatmeal").unwrap();
    assert_eq!(
        m.to_meal(oatmeal, None, None).image_url.as_deref(),
        Some(DEFAULT_IMAGE_URL)
    );
}

#[test]
fn to_meal_applies_macro_overrides() {
    let m = matcher();
    let template = m.catalog().get("salmon-bowl").unwrap();
    let macros = Macros::new(520.0, 34.0, 40.0, 22.0);
    assert_eq!(m.to_meal(template, Some(macros), None).macros, macros);
    assert_eq!(m.to_meal(template, None, None).macros, DEFAULT_MACROS);
}

#[test]
fn to_meal_derives_name_from_ingredients() {
    let m = matcher();
    let template = m.catalog().get("chicken-rice").unwrap();
    assert_eq!(
        m.to_meal(template, None, None).name,
        "Chicken Breast & Broccoli & Rice"
    );
}

#[test]
fn to_meals_suffixes_only_repeated_templates() {
    let m = matcher();
    let salmon = m.catalog().get("salmon-bowl").unwrap();
    let tofu = m.catalog().get("tofu-stir-fry").unwrap();

    let meals = m.to_meals(&[salmon, tofu, salmon]);
    let ids: Vec<&str> = meals.iter().map(|meal| meal.id.as_str()).collect();
    assert_eq!(ids, ["salmon-bowl-0", "tofu-stir-fry", "salmon-bowl-2"]);
}
