use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    http::handlers::json_body,
    models::{Place, place::PlacePayload},
    services::place::{self, DEFAULT_TOP_MIN_RATING},
    state::AppState,
};

#[derive(Deserialize)]
pub struct PlacesQuery {
    pub city: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRatedQuery {
    pub min_rating: Option<f32>,
}

pub async fn create_place_handler(
    State(state): State<AppState>,
    payload: Result<Json<PlacePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Place>), (StatusCode, String)> {
    let payload = json_body(payload)?;

    match place::create_place(state.store.as_ref(), payload).await {
        Ok(place) => Ok((StatusCode::CREATED, Json(place))),
        Err(err) => {
            tracing::error!("Error creating place: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_places_handler(
    State(state): State<AppState>,
    Query(query): Query<PlacesQuery>,
) -> Result<Json<Vec<Place>>, (StatusCode, String)> {
    place::list_places(state.store.as_ref(), query.city)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing places: {}", e);
            e.to_response()
        })
}

pub async fn get_top_rated_places_handler(
    State(state): State<AppState>,
    Query(query): Query<TopRatedQuery>,
) -> Result<Json<Vec<Place>>, (StatusCode, String)> {
    let min_rating = query.min_rating.unwrap_or(DEFAULT_TOP_MIN_RATING);

    place::top_rated_places(state.store.as_ref(), min_rating)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing top rated places: {}", e);
            e.to_response()
        })
}

pub async fn get_place_handler(
    Path(place_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Place>, (StatusCode, String)> {
    place::get_place(state.store.as_ref(), place_id)
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn update_place_handler(
    Path(place_id): Path<Uuid>,
    State(state): State<AppState>,
    payload: Result<Json<PlacePayload>, JsonRejection>,
) -> Result<Json<Place>, (StatusCode, String)> {
    let payload = json_body(payload)?;

    match place::update_place(state.store.as_ref(), place_id, payload).await {
        Ok(place) => Ok(Json(place)),
        Err(err) => {
            tracing::error!("Error updating place {}: {}", place_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn delete_place_handler(
    Path(place_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    match place::delete_place(state.store.as_ref(), place_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => {
            tracing::error!("Error deleting place {}: {}", place_id, err);
            Err(err.to_response())
        }
    }
}
