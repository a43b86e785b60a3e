use axum::{
    Router,
    routing::{get, post},
};

use crate::{http::handlers::*, state::AppState};

pub fn create_http_routes(state: AppState) -> Router {
    let places = Router::new()
        .route("/", post(create_place_handler).get(get_places_handler))
        .route("/top-rated", get(get_top_rated_places_handler))
        .route(
            "/{id}",
            get(get_place_handler)
                .put(update_place_handler)
                .delete(delete_place_handler),
        );

    let kebabs = Router::new()
        .route("/", post(create_kebab_handler).get(get_kebabs_handler))
        .route("/top", get(get_top_kebabs_handler))
        .route("/place/{place_id}", get(get_kebabs_by_place_handler))
        .route(
            "/{id}",
            get(get_kebab_handler)
                .put(update_kebab_handler)
                .delete(delete_kebab_handler),
        );

    let reviews = Router::new()
        .route("/", post(create_review_handler).get(get_reviews_handler))
        .route("/user/{user_id}", get(get_reviews_by_user_handler))
        .route("/kebab/{kebab_id}", get(get_reviews_by_kebab_handler))
        .route(
            "/{id}",
            get(get_review_handler)
                .put(update_review_handler)
                .delete(delete_review_handler),
        );

    let users = Router::new()
        .route("/", post(create_user_handler).get(get_users_handler))
        .route("/username/{username}", get(get_user_by_username_handler))
        .route(
            "/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        );

    Router::new()
        .nest("/api/places", places)
        .nest("/api/kebabs", kebabs)
        .nest("/api/review", reviews)
        .nest("/api/users", users)
        .route("/api/bread-types", get(get_bread_types_handler))
        .route("/api/meat-types", get(get_meat_types_handler))
        .route("/api/sauces", get(get_sauces_handler))
        .route("/api/ingredients", get(get_ingredients_handler))
        .with_state(state)
}
