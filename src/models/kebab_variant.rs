use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        enums::{Ingredient, PriceRange, Sauce},
        validate,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KebabVariant {
    pub id: Uuid,
    pub place_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub bread_type_id: Uuid,
    pub meat_type_id: Uuid,
    pub is_vegetarian: bool,
    pub spicy: bool,
    pub sauces: BTreeSet<Sauce>,
    pub ingredients: BTreeSet<Ingredient>,
    pub average_rating: f32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKebabPayload {
    pub place_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub bread_type_id: Uuid,
    pub meat_type_id: Uuid,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub spicy: bool,
    #[serde(default)]
    pub sauces: BTreeSet<Sauce>,
    #[serde(default)]
    pub ingredients: BTreeSet<Ingredient>,
}

impl CreateKebabPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        validate::required_text("Name", &self.name, 100)?;
        if let Some(description) = &self.description {
            validate::max_length("Description", description, 500)?;
        }
        validate::positive_price(self.price)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKebabPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub bread_type_id: Option<Uuid>,
    pub meat_type_id: Option<Uuid>,
    pub is_vegetarian: Option<bool>,
    pub spicy: Option<bool>,
    pub sauces: Option<BTreeSet<Sauce>>,
    pub ingredients: Option<BTreeSet<Ingredient>>,
}

impl UpdateKebabPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validate::required_text("Name", name, 100)?;
        }
        if let Some(description) = &self.description {
            validate::max_length("Description", description, 500)?;
        }
        if let Some(price) = self.price {
            validate::positive_price(price)?;
        }
        Ok(())
    }

    /// Applies the present fields. Derived and immutable fields are never touched.
    pub fn apply(self, kebab: &mut KebabVariant) {
        if let Some(name) = self.name {
            kebab.name = name;
        }
        if let Some(description) = self.description {
            kebab.description = Some(description);
        }
        if let Some(price) = self.price {
            kebab.price = validate::round_to_cents(price);
        }
        if let Some(id) = self.bread_type_id {
            kebab.bread_type_id = id;
        }
        if let Some(id) = self.meat_type_id {
            kebab.meat_type_id = id;
        }
        if let Some(v) = self.is_vegetarian {
            kebab.is_vegetarian = v;
        }
        if let Some(v) = self.spicy {
            kebab.spicy = v;
        }
        if let Some(sauces) = self.sauces {
            kebab.sauces = sauces;
        }
        if let Some(ingredients) = self.ingredients {
            kebab.ingredients = ingredients;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KebabQuery {
    pub place_id: Option<Uuid>,
    pub city: Option<String>,
    pub vegetarian: Option<bool>,
    pub spicy: Option<bool>,
    pub min_rating: Option<f32>,
    pub rated_only: bool,
    pub order_by_rating: bool,
    pub limit: Option<usize>,
}

impl KebabQuery {
    pub fn for_place(place_id: Uuid) -> Self {
        Self {
            place_id: Some(place_id),
            ..Default::default()
        }
    }

    /// Filters that can be checked on the variant alone. `city` needs the owning place
    /// and is resolved by the store.
    pub fn matches(&self, kebab: &KebabVariant) -> bool {
        if self.place_id.is_some_and(|id| id != kebab.place_id) {
            return false;
        }
        if self.vegetarian.is_some_and(|v| v != kebab.is_vegetarian) {
            return false;
        }
        if self.spicy.is_some_and(|v| v != kebab.spicy) {
            return false;
        }
        if self.min_rating.is_some_and(|min| kebab.average_rating < min) {
            return false;
        }
        if self.rated_only && kebab.average_rating <= 0.0 {
            return false;
        }
        true
    }
}

/// API shape of a kebab variant with its references resolved to names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KebabVariantView {
    pub id: Uuid,
    pub place_id: Uuid,
    pub place_name: String,
    pub place_city: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub price_range: PriceRange,
    pub price_symbol: String,
    pub bread_type_name: String,
    pub meat_type_name: String,
    pub is_vegetarian: bool,
    pub spicy: bool,
    pub sauces: Vec<String>,
    pub ingredients: Vec<String>,
    pub average_rating: f32,
    pub created_at: DateTime<Utc>,
}
