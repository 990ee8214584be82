//! Public types for the Larder API.

mod meal;
mod request;
mod slot;
mod template;

pub use meal::{Macros, Meal, MealIngredient, ResultSource};
pub use request::SignatureInput;
pub use slot::MealSlot;
pub use template::{MatchResult, MatchType, MealTemplate, TemplateIngredient};
