pub mod catalog;
pub mod kebab;
pub mod place;
pub mod review;
pub mod user;

use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};

use crate::errors::AppError;

pub use catalog::{
    get_bread_types_handler, get_ingredients_handler, get_meat_types_handler, get_sauces_handler,
};

pub use kebab::{
    create_kebab_handler, delete_kebab_handler, get_kebab_handler, get_kebabs_by_place_handler,
    get_kebabs_handler, get_top_kebabs_handler, update_kebab_handler,
};

pub use place::{
    create_place_handler, delete_place_handler, get_place_handler, get_places_handler,
    get_top_rated_places_handler, update_place_handler,
};

pub use review::{
    create_review_handler, delete_review_handler, get_review_handler, get_reviews_by_kebab_handler,
    get_reviews_by_user_handler, get_reviews_handler, update_review_handler,
};

pub use user::{
    create_user_handler, delete_user_handler, get_user_by_username_handler, get_user_handler,
    get_users_handler, update_user_handler,
};

/// Unwraps a JSON body, answering 400 when it cannot be read into `T`.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, (StatusCode, String)> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => {
            let err = AppError::BadRequest(rejection.body_text());
            tracing::warn!("Rejected request body: {}", err);
            Err(err.to_response())
        }
    }
}
