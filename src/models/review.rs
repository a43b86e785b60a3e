use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::AppError, models::validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kebab_variant_id: Uuid,
    pub rating: i16,
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewPayload {
    pub kebab_variant_id: Uuid,
    // wider than the column so out-of-range numbers reach validation
    pub rating: i64,
    pub title: String,
    pub comment: String,
}

impl CreateReviewPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        validate::rating(self.rating)?;
        validate::required_text("Title", &self.title, 100)?;
        validate::required_text("Comment", &self.comment, 1000)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewPayload {
    pub rating: Option<i64>,
    pub title: Option<String>,
    pub comment: Option<String>,
}

impl UpdateReviewPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(rating) = self.rating {
            validate::rating(rating)?;
        }
        if let Some(title) = &self.title {
            validate::required_text("Title", title, 100)?;
        }
        if let Some(comment) = &self.comment {
            validate::required_text("Comment", comment, 1000)?;
        }
        Ok(())
    }

    pub fn apply(self, review: &mut Review) -> Result<(), AppError> {
        if let Some(rating) = self.rating {
            review.rating = validate::rating(rating)?;
        }
        if let Some(title) = self.title {
            review.title = title;
        }
        if let Some(comment) = self.comment {
            review.comment = comment;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewQuery {
    pub user_id: Option<Uuid>,
    pub kebab_variant_id: Option<Uuid>,
}

impl ReviewQuery {
    pub fn matches(&self, review: &Review) -> bool {
        self.user_id.is_none_or(|id| id == review.user_id)
            && self
                .kebab_variant_id
                .is_none_or(|id| id == review.kebab_variant_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub kebab_variant_id: Uuid,
    pub kebab_variant_name: String,
    pub place_name: String,
    pub rating: i16,
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
