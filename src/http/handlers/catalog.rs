use axum::{Json, extract::State, http::StatusCode};

use crate::{
    models::{BreadType, MeatType, catalog::EnumOption},
    services::catalog,
    state::AppState,
};

pub async fn get_bread_types_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<BreadType>>, (StatusCode, String)> {
    catalog::list_bread_types(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn get_meat_types_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<MeatType>>, (StatusCode, String)> {
    catalog::list_meat_types(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn get_sauces_handler() -> Json<Vec<EnumOption>> {
    Json(catalog::list_sauces())
}

pub async fn get_ingredients_handler() -> Json<Vec<EnumOption>> {
    Json(catalog::list_ingredients())
}
