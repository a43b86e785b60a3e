use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    http::handlers::json_body,
    models::review::{CreateReviewPayload, ReviewView, UpdateReviewPayload},
    services::review,
    state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerQuery {
    pub user_id: Uuid,
}

pub async fn create_review_handler(
    State(state): State<AppState>,
    Query(query): Query<ReviewerQuery>,
    payload: Result<Json<CreateReviewPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewView>), (StatusCode, String)> {
    let payload = json_body(payload)?;

    match review::create_review(state.store.as_ref(), query.user_id, payload).await {
        Ok(review) => Ok((StatusCode::CREATED, Json(review))),
        Err(err) => {
            tracing::error!("Error creating review for user {}: {}", query.user_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn get_reviews_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewView>>, (StatusCode, String)> {
    review::list_reviews(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing reviews: {}", e);
            e.to_response()
        })
}

pub async fn get_review_handler(
    Path(review_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ReviewView>, (StatusCode, String)> {
    review::get_review(state.store.as_ref(), review_id)
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn get_reviews_by_user_handler(
    Path(user_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewView>>, (StatusCode, String)> {
    review::reviews_by_user(state.store.as_ref(), user_id)
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn get_reviews_by_kebab_handler(
    Path(kebab_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewView>>, (StatusCode, String)> {
    review::reviews_by_kebab(state.store.as_ref(), kebab_id)
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn update_review_handler(
    Path(review_id): Path<Uuid>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateReviewPayload>, JsonRejection>,
) -> Result<Json<ReviewView>, (StatusCode, String)> {
    let payload = json_body(payload)?;

    match review::update_review(state.store.as_ref(), review_id, payload).await {
        Ok(review) => Ok(Json(review)),
        Err(err) => {
            tracing::error!("Error updating review {}: {}", review_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn delete_review_handler(
    Path(review_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    match review::delete_review(state.store.as_ref(), review_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => {
            tracing::error!("Error deleting review {}: {}", review_id, err);
            Err(err.to_response())
        }
    }
}
