use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{enums::PriceRange, validate},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub price_range: PriceRange,
    pub average_rating: f32,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePayload {
    pub name: String,
    pub address: String,
    pub city: String,
    pub price_range: PriceRange,
}

impl PlacePayload {
    pub fn validate(&self) -> Result<(), AppError> {
        validate::required_text("Name", &self.name, 200)?;
        validate::required_text("Address", &self.address, 255)?;
        validate::required_text("City", &self.city, 100)?;
        Ok(())
    }
}

/// Filter for place listings. `order_by_rating` sorts highest first, otherwise oldest first.
#[derive(Debug, Clone, Default)]
pub struct PlaceQuery {
    pub city: Option<String>,
    pub min_rating: Option<f32>,
    pub order_by_rating: bool,
}

impl PlaceQuery {
    pub fn matches(&self, place: &Place) -> bool {
        if let Some(city) = &self.city {
            if &place.city != city {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if place.average_rating < min {
                return false;
            }
        }
        true
    }
}
