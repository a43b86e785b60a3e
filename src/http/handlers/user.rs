use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    http::handlers::json_body,
    models::{
        User,
        user::{CreateUserPayload, UpdateUserPayload},
    },
    services::user,
    state::AppState,
};

pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), (StatusCode, String)> {
    let payload = json_body(payload)?;

    match user::create_user(state.store.as_ref(), payload).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user))),
        Err(err) => {
            tracing::error!("Error creating user: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, (StatusCode, String)> {
    user::list_users(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing users: {}", e);
            e.to_response()
        })
}

pub async fn get_user_handler(
    Path(user_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<User>, (StatusCode, String)> {
    user::get_user(state.store.as_ref(), user_id)
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn get_user_by_username_handler(
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<User>, (StatusCode, String)> {
    user::get_user_by_username(state.store.as_ref(), &username)
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn update_user_handler(
    Path(user_id): Path<Uuid>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateUserPayload>, JsonRejection>,
) -> Result<Json<User>, (StatusCode, String)> {
    let payload = json_body(payload)?;

    match user::update_user(state.store.as_ref(), user_id, payload).await {
        Ok(user) => Ok(Json(user)),
        Err(err) => {
            tracing::error!("Error updating user {}: {}", user_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn delete_user_handler(
    Path(user_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    match user::delete_user(state.store.as_ref(), user_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => {
            tracing::error!("Error deleting user {}: {}", user_id, err);
            Err(err.to_response())
        }
    }
}
