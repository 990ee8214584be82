//! Image-key resolution.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::MealSlot;
use crate::{LarderError, Result};

/// Global default used when nothing more specific is configured.
pub const DEFAULT_IMAGE_URL: &str = "/images/meals/default.jpg";

/// Maps template image keys to displayable URLs.
///
/// Resolution falls back in three steps: the specific key, then the
/// slot's default, then the global default.
///
/// ```rust
/// # use larder::{ImageTable, MealSlot};
/// let table = ImageTable::default()
///     .with_image("salmon-bowl", "/img/salmon.jpg")
///     .with_slot_default(MealSlot::Dinner, "/img/dinner.jpg");
/// assert_eq!(table.resolve(Some("salmon-bowl"), MealSlot::Dinner), "/img/salmon.jpg");
/// assert_eq!(table.resolve(Some("unknown"), MealSlot::Dinner), "/img/dinner.jpg");
/// assert_eq!(table.resolve(None, MealSlot::Lunch), larder::catalog::DEFAULT_IMAGE_URL);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageTable {
    #[serde(default)]
    pub images: HashMap<String, String>,
    #[serde(default)]
    pub slot_defaults: HashMap<MealSlot, String>,
    #[serde(default = "default_image_url")]
    pub default: String,
}

fn default_image_url() -> String {
    DEFAULT_IMAGE_URL.to_string()
}

impl Default for ImageTable {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
            slot_defaults: HashMap::new(),
            default: default_image_url(),
        }
    }
}

impl ImageTable {
    pub fn with_image(mut self, key: impl Into<String>, url: impl Into<String>) -> Self {
        self.images.insert(key.into(), url.into());
        self
    }

    pub fn with_slot_default(mut self, slot: MealSlot, url: impl Into<String>) -> Self {
        self.slot_defaults.insert(slot, url.into());
        self
    }

    pub fn with_default(mut self, url: impl Into<String>) -> Self {
        self.default = url.into();
        self
    }

    /// Load a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LarderError::Configuration(format!(
                "failed to read image table {}: {e}",
                path.display()
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            LarderError::Configuration(format!(
                "failed to parse image table {}: {e}",
                path.display()
            ))
        })
    }

    /// Resolve `key` for a meal in `slot`.
    pub fn resolve(&self, key: Option<&str>, slot: MealSlot) -> &str {
        key.and_then(|k| self.images.get(k))
            .or_else(|| self.slot_defaults.get(&slot))
            .map(String::as_str)
            .unwrap_or(self.default.as_str())
    }
}
