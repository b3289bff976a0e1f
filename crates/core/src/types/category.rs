//! Grocery item categories.
//!
//! Categories are a closed set. Each one has a storage key (what goes into the
//! database and into form submissions) and a human-readable label (what the
//! user sees). The two are kept in a single ordered table so the choice list
//! shown in forms always has the same order.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a category key is not part of the closed set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown item category: {0}")]
pub struct UnknownCategory(pub String);

/// Category of a grocery item.
///
/// Defaults to [`ItemCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    Produce,
    Deli,
    Bakery,
    Pantry,
    Frozen,
    #[default]
    Other,
}

/// Ordered (category, storage key, label) table.
const CHOICES: [(ItemCategory, &str, &str); 6] = [
    (ItemCategory::Produce, "PRODUCE", "Produce"),
    (ItemCategory::Deli, "DELI", "Deli"),
    (ItemCategory::Bakery, "BAKERY", "Bakery"),
    (ItemCategory::Pantry, "PANTRY", "Pantry"),
    (ItemCategory::Frozen, "FROZEN", "Frozen"),
    (ItemCategory::Other, "OTHER", "Other"),
];

impl ItemCategory {
    /// `(key, label)` pairs in display order, for rendering a choice list.
    pub fn choices() -> impl Iterator<Item = (&'static str, &'static str)> {
        CHOICES.iter().map(|(_, key, label)| (*key, *label))
    }

    /// The storage key, e.g. `"PRODUCE"`.
    #[must_use]
    pub fn key(self) -> &'static str {
        CHOICES
            .iter()
            .find(|(category, _, _)| *category == self)
            .map_or("OTHER", |(_, key, _)| *key)
    }

    /// The display label, e.g. `"Produce"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        CHOICES
            .iter()
            .find(|(category, _, _)| *category == self)
            .map_or("Other", |(_, _, label)| *label)
    }

    /// Look up a category by its storage key.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCategory`] if the key is not one of the known keys.
    /// Matching is exact: keys are upper case.
    pub fn from_key(key: &str) -> Result<Self, UnknownCategory> {
        CHOICES
            .iter()
            .find(|(_, k, _)| *k == key)
            .map(|(category, _, _)| *category)
            .ok_or_else(|| UnknownCategory(key.to_owned()))
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_choices_order() {
        let keys: Vec<_> = ItemCategory::choices().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            ["PRODUCE", "DELI", "BAKERY", "PANTRY", "FROZEN", "OTHER"]
        );
    }

    #[test]
    fn test_key_and_label_differ() {
        for (category, _, _) in CHOICES {
            assert_ne!(category.key(), category.label());
            assert_eq!(category.key(), category.label().to_uppercase());
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(
            ItemCategory::from_key("BAKERY").unwrap(),
            ItemCategory::Bakery
        );
        assert_eq!(
            "FROZEN".parse::<ItemCategory>().unwrap(),
            ItemCategory::Frozen
        );
    }

    #[test]
    fn test_from_key_rejects_unknown() {
        assert_eq!(
            ItemCategory::from_key("DAIRY"),
            Err(UnknownCategory("DAIRY".to_string()))
        );
        // Labels are not keys
        assert!(ItemCategory::from_key("Produce").is_err());
    }

    #[test]
    fn test_default_is_other() {
        assert_eq!(ItemCategory::default(), ItemCategory::Other);
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(ItemCategory::Deli.to_string(), "Deli");
    }

    #[test]
    fn test_serde_uses_key() {
        let json = serde_json::to_string(&ItemCategory::Pantry).unwrap();
        assert_eq!(json, "\"PANTRY\"");
    }
}
