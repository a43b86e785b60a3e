use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    http::handlers::json_body,
    models::kebab_variant::{CreateKebabPayload, KebabVariantView, UpdateKebabPayload},
    services::kebab::{self, DEFAULT_TOP_LIMIT},
    state::AppState,
};

#[derive(Deserialize)]
pub struct KebabsQuery {
    pub vegetarian: Option<bool>,
    pub spicy: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopKebabsQuery {
    pub city: Option<String>,
    pub min_rating: Option<f32>,
    pub limit: Option<usize>,
}

pub async fn create_kebab_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateKebabPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<KebabVariantView>), (StatusCode, String)> {
    let payload = json_body(payload)?;

    match kebab::create_kebab(state.store.as_ref(), payload).await {
        Ok(kebab) => Ok((StatusCode::CREATED, Json(kebab))),
        Err(err) => {
            tracing::error!("Error creating kebab variant: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_kebabs_handler(
    State(state): State<AppState>,
    Query(query): Query<KebabsQuery>,
) -> Result<Json<Vec<KebabVariantView>>, (StatusCode, String)> {
    kebab::list_kebabs(state.store.as_ref(), query.vegetarian, query.spicy)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing kebab variants: {}", e);
            e.to_response()
        })
}

pub async fn get_top_kebabs_handler(
    State(state): State<AppState>,
    Query(query): Query<TopKebabsQuery>,
) -> Result<Json<Vec<KebabVariantView>>, (StatusCode, String)> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);

    kebab::top_rated_kebabs(state.store.as_ref(), query.city, query.min_rating, limit)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing top kebab variants: {}", e);
            e.to_response()
        })
}

pub async fn get_kebabs_by_place_handler(
    Path(place_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<KebabVariantView>>, (StatusCode, String)> {
    kebab::kebabs_by_place(state.store.as_ref(), place_id)
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn get_kebab_handler(
    Path(kebab_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<KebabVariantView>, (StatusCode, String)> {
    kebab::get_kebab(state.store.as_ref(), kebab_id)
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn update_kebab_handler(
    Path(kebab_id): Path<Uuid>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateKebabPayload>, JsonRejection>,
) -> Result<Json<KebabVariantView>, (StatusCode, String)> {
    let payload = json_body(payload)?;

    match kebab::update_kebab(state.store.as_ref(), kebab_id, payload).await {
        Ok(kebab) => Ok(Json(kebab)),
        Err(err) => {
            tracing::error!("Error updating kebab variant {}: {}", kebab_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn delete_kebab_handler(
    Path(kebab_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    match kebab::delete_kebab(state.store.as_ref(), kebab_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => {
            tracing::error!("Error deleting kebab variant {}: {}", kebab_id, err);
            Err(err.to_response())
        }
    }
}
