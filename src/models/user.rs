use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::AppError, models::validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    pub username: String,
    pub email: String,
}

impl CreateUserPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        validate::username(&self.username)?;
        validate::email(&self.email)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(username) = &self.username {
            validate::username(username)?;
        }
        if let Some(email) = &self.email {
            validate::email(email)?;
        }
        Ok(())
    }
}
