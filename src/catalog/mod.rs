//! Static, read-only inputs to the matcher.
//!
//! - [`TemplateCatalog`] - curated templates, one list per meal slot.
//! - [`ImageTable`] - image-key → URL resolution with per-slot and global
//!   defaults.
//!
//! Both are loaded once at startup (usually from JSON) and shared
//! immutably. Their content is curated elsewhere.

mod images;

pub use images::{DEFAULT_IMAGE_URL, ImageTable};

use std::collections::HashMap;
use std::path::Path;

use crate::types::{MealSlot, MealTemplate};
use crate::{LarderError, Result};

/// Templates grouped by slot, in their original order.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    by_slot: HashMap<MealSlot, Vec<MealTemplate>>,
}

impl TemplateCatalog {
    /// An empty catalog. Every fallback will synthesise a placeholder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `templates` by their slot.
    pub fn from_templates(templates: impl IntoIterator<Item = MealTemplate>) -> Self {
        let mut by_slot: HashMap<MealSlot, Vec<MealTemplate>> = HashMap::new();
        for template in templates {
            by_slot.entry(template.slot).or_default().push(template);
        }
        Self { by_slot }
    }

    /// Parse a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self> {
        let templates: Vec<MealTemplate> = serde_json::from_str(json)?;
        Ok(Self::from_templates(templates))
    }

    /// Load a JSON array of templates from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LarderError::Configuration(format!(
                "failed to read template catalog {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&content).map_err(|e| {
            LarderError::Configuration(format!(
                "failed to parse template catalog {}: {e}",
                path.display()
            ))
        })
    }

    /// Templates for `slot` (empty slice if none).
    pub fn for_slot(&self, slot: MealSlot) -> &[MealTemplate] {
        self.by_slot.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look a template up by id across all slots.
    pub fn get(&self, id: &str) -> Option<&MealTemplate> {
        self.by_slot.values().flatten().find(|t| t.id == id)
    }

    /// Total number of templates.
    pub fn len(&self) -> usize {
        self.by_slot.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
