//! HTML form payloads and their validation.
//!
//! Every form is deserialized with all fields defaulting to the empty string,
//! so a missing field and an empty field are treated the same. `validate`
//! either produces an immutable, validated value or a [`FieldErrors`] map
//! that is rendered next to the inputs. The submitted form is kept as-is so
//! the page can be re-rendered with the user's values.

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde::Deserialize;

use grocer_core::{ItemCategory, StoreId, Username};

use crate::models::{GroceryItem, GroceryStore, ItemInput, NewUser, StoreInput};

const REQUIRED: &str = "This field is required.";
const DRAGON_EGG: &str = "Dragon eggs are not allowed!";
const INVALID_NUMBER: &str = "Not a valid float value.";
const NEGATIVE_NUMBER: &str = "Number must be at least 0.";
const INVALID_URL: &str = "Invalid URL.";
const INVALID_CHOICE: &str = "Not a valid choice.";

/// Shown when the username is already registered.
pub const USERNAME_TAKEN: &str = "Username already taken! Please choose a different one.";

/// Shown when a login attempt fails, whatever the reason.
pub const INVALID_LOGIN: &str = "Invalid username or password.";

const STORE_TITLE_LEN: (usize, usize) = (3, 16);
const ITEM_NAME_LEN: (usize, usize) = (3, 16);

// =============================================================================
// Errors
// =============================================================================

/// Validation messages keyed by field name.
///
/// Only the first failure per field is kept, matching what the form shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Record an error for `field` unless it already has one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// The error message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the fields that failed, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if !self.is_empty() {
            return Err(self);
        }
        // Every `None` from `value` corresponds to a recorded error.
        value().ok_or(self)
    }
}

/// An `<option>` in a `<select>`, with selection precomputed for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

// =============================================================================
// Field Checks
// =============================================================================

fn length_message(min: usize, max: usize) -> String {
    format!("Field must be between {min} and {max} characters long.")
}

/// Trim and require a text field, optionally bounding its length.
fn required_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    bounds: Option<(usize, usize)>,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }

    if let Some((min, max)) = bounds {
        let len = value.chars().count();
        if !(min..=max).contains(&len) {
            errors.add(field, length_message(min, max));
            return None;
        }
    }

    Some(value.to_owned())
}

fn contains_dragon_egg(name: &str) -> bool {
    let squashed: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    squashed.contains("dragonegg")
}

fn parse_price(errors: &mut FieldErrors, value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        errors.add("price", REQUIRED);
        return None;
    }

    match value.parse::<f64>() {
        Ok(price) if !price.is_finite() => {
            errors.add("price", INVALID_NUMBER);
            None
        }
        Ok(price) if price < 0.0 => {
            errors.add("price", NEGATIVE_NUMBER);
            None
        }
        Ok(price) => Some(price),
        Err(_) => {
            errors.add("price", INVALID_NUMBER);
            None
        }
    }
}

/// Empty means "no photo"; anything else must be an absolute http(s) URL.
fn parse_photo_url(errors: &mut FieldErrors, value: &str) -> Option<Option<String>> {
    let value = value.trim();
    if value.is_empty() {
        return Some(None);
    }

    match url::Url::parse(value) {
        Ok(url)
            if matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| !h.is_empty()) =>
        {
            Some(Some(value.to_owned()))
        }
        _ => {
            errors.add("photo_url", INVALID_URL);
            None
        }
    }
}

// =============================================================================
// Sign Up / Login
// =============================================================================

/// Sign-up form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
}

impl SignUpForm {
    /// Validate into a [`NewUser`].
    ///
    /// Username uniqueness is not checked here; the insert reports it.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<NewUser, FieldErrors> {
        let mut errors = FieldErrors::default();

        let username = Username::parse(&self.username)
            .map_err(|e| errors.add("username", e.to_string()))
            .ok();

        if self.password.trim().is_empty() {
            errors.add("password", REQUIRED);
        }

        errors.finish(|| {
            Some(NewUser {
                username: username?,
                password: SecretString::from(self.password.clone()),
            })
        })
    }
}

/// Login form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Check both fields are present, returning the trimmed username.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<&str, FieldErrors> {
        let mut errors = FieldErrors::default();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.trim().is_empty() {
            errors.add("password", REQUIRED);
        }

        errors.finish(|| Some(username))
    }
}

// =============================================================================
// Grocery Store
// =============================================================================

/// Store create/edit form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreForm {
    pub title: String,
    pub address: String,
}

impl StoreForm {
    /// Pre-fill the form from an existing store.
    #[must_use]
    pub fn from_store(store: &GroceryStore) -> Self {
        Self {
            title: store.title.clone(),
            address: store.address.clone(),
        }
    }

    /// Validate into a [`StoreInput`].
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<StoreInput, FieldErrors> {
        let mut errors = FieldErrors::default();

        let title = required_text(&mut errors, "title", &self.title, Some(STORE_TITLE_LEN));
        let address = required_text(&mut errors, "address", &self.address, None);

        errors.finish(|| {
            Some(StoreInput {
                title: title?,
                address: address?,
            })
        })
    }
}

// =============================================================================
// Grocery Item
// =============================================================================

/// Item create/edit form data.
///
/// `store` holds the selected store's ID as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub price: String,
    pub category: String,
    pub photo_url: String,
    pub store: String,
}

impl ItemForm {
    /// Pre-fill the form from an existing item.
    #[must_use]
    pub fn from_item(item: &GroceryItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price.to_string(),
            category: item.category.key().to_owned(),
            photo_url: item.photo_url.clone().unwrap_or_default(),
            store: item.store_id.to_string(),
        }
    }

    /// Validate into an [`ItemInput`].
    ///
    /// `stores` is the set of stores the user could pick from; the selected
    /// store must be one of them.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self, stores: &[GroceryStore]) -> Result<ItemInput, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = required_text(&mut errors, "name", &self.name, Some(ITEM_NAME_LEN));
        if name.as_deref().is_some_and(contains_dragon_egg) {
            errors.add("name", DRAGON_EGG);
        }

        let price = parse_price(&mut errors, &self.price);

        let category = match self.category.trim() {
            "" => Some(ItemCategory::default()),
            key => ItemCategory::from_key(key)
                .map_err(|_| errors.add("category", INVALID_CHOICE))
                .ok(),
        };

        let photo_url = parse_photo_url(&mut errors, &self.photo_url);

        let store_id = match self.store.trim() {
            "" => {
                errors.add("store", REQUIRED);
                None
            }
            raw => raw
                .parse::<StoreId>()
                .ok()
                .filter(|id| stores.iter().any(|s| s.id == *id))
                .or_else(|| {
                    errors.add("store", INVALID_CHOICE);
                    None
                }),
        };

        errors.finish(|| {
            Some(ItemInput {
                name: name?,
                price: price?,
                category: category?,
                photo_url: photo_url?,
                store_id: store_id?,
            })
        })
    }

    /// Category choices in display order with the submitted one selected.
    ///
    /// An empty submission selects `OTHER`.
    #[must_use]
    pub fn category_options(&self) -> Vec<SelectOption> {
        let current = match self.category.trim() {
            "" => ItemCategory::default().key(),
            key => key,
        };
        ItemCategory::choices()
            .map(|(key, label)| SelectOption {
                value: key.to_owned(),
                label: label.to_owned(),
                selected: key == current,
            })
            .collect()
    }

    /// Store choices in ID order with the submitted one selected.
    #[must_use]
    pub fn store_options(&self, stores: &[GroceryStore]) -> Vec<SelectOption> {
        let current = self.store.trim();
        stores
            .iter()
            .map(|store| {
                let value = store.id.to_string();
                SelectOption {
                    selected: value == current,
                    value,
                    label: store.title.clone(),
                }
            })
            .collect()
    }
}
