use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use kebab_rating_be::{
    build_app,
    config::Config,
    db::{MemoryStore, seed::seed_catalog},
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> Router {
    let store = MemoryStore::new();
    seed_catalog(&store).await.expect("seed catalog");
    build_app(AppState::new(Arc::new(store)), &Config::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn setup_kebab(app: &Router) -> (String, String) {
    let (status, place) = send(
        app,
        Method::POST,
        "/api/places",
        Some(json!({
            "name": "Mustafa's Gemüse Kebap",
            "address": "Mehringdamm 32",
            "city": "Berlin",
            "priceRange": "CHEAP"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let place_id = place["id"].as_str().unwrap().to_string();

    let (_, breads) = send(app, Method::GET, "/api/bread-types", None).await;
    let (_, meats) = send(app, Method::GET, "/api/meat-types", None).await;

    let (status, kebab) = send(
        app,
        Method::POST,
        "/api/kebabs",
        Some(json!({
            "placeId": place_id,
            "name": "Gemüse Kebap",
            "price": 5.5,
            "breadTypeId": breads[0]["id"],
            "meatTypeId": meats[0]["id"],
            "isVegetarian": false,
            "spicy": true,
            "sauces": ["GARLIC", "HOT_SAUCE"],
            "ingredients": ["SALAD", "TOMATO"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(kebab["averageRating"], 0.0);
    assert_eq!(kebab["priceRange"], "MEDIUM");
    assert_eq!(kebab["priceSymbol"], "€€");
    assert_eq!(kebab["placeName"], "Mustafa's Gemüse Kebap");

    (place_id, kebab["id"].as_str().unwrap().to_string())
}

async fn setup_user(app: &Router, username: &str) -> String {
    let (status, user) = send(
        app,
        Method::POST,
        "/api/users",
        Some(json!({ "username": username, "email": format!("{username}@example.com") })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    user["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn catalog_is_seeded() {
    let app = test_app().await;

    let (status, breads) = send(&app, Method::GET, "/api/bread-types", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(breads.as_array().unwrap().len(), 3);

    let (status, meats) = send(&app, Method::GET, "/api/meat-types", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(meats.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn review_flow_updates_ratings() {
    let app = test_app().await;
    let (place_id, kebab_id) = setup_kebab(&app).await;
    let alice = setup_user(&app, "alice").await;

    let (status, review) = send(
        &app,
        Method::POST,
        &format!("/api/review?userId={alice}"),
        Some(json!({
            "kebabVariantId": kebab_id,
            "rating": 4,
            "title": "Sehr gut",
            "comment": "Lange Schlange, hat sich gelohnt"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["username"], "alice");
    assert_eq!(review["rating"], 4);

    let (status, kebab) = send(&app, Method::GET, &format!("/api/kebabs/{kebab_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kebab["averageRating"], 4.0);

    let (_, place) = send(&app, Method::GET, &format!("/api/places/{place_id}"), None).await;
    assert_eq!(place["averageRating"], 4.0);
    assert_eq!(place["reviewCount"], 1);

    let (status, top) = send(&app, Method::GET, "/api/places/top-rated?minRating=4.0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(top.as_array().unwrap().len(), 1);

    let review_id = review["id"].as_str().unwrap();
    let (status, _) = send(&app, Method::DELETE, &format!("/api/review/{review_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, place) = send(&app, Method::GET, &format!("/api/places/{place_id}"), None).await;
    assert_eq!(place["averageRating"], 0.0);
    assert_eq!(place["reviewCount"], 0);
}

#[tokio::test]
async fn duplicate_review_is_conflict() {
    let app = test_app().await;
    let (_, kebab_id) = setup_kebab(&app).await;
    let alice = setup_user(&app, "alice").await;
    let body = json!({
        "kebabVariantId": kebab_id,
        "rating": 5,
        "title": "Top",
        "comment": "Bester Döner"
    });

    let uri = format!("/api/review?userId={alice}");
    let (status, _) = send(&app, Method::POST, &uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, Method::POST, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_rating_is_bad_request() {
    let app = test_app().await;
    let (_, kebab_id) = setup_kebab(&app).await;
    let alice = setup_user(&app, "alice").await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/review?userId={alice}"),
        Some(json!({
            "kebabVariantId": kebab_id,
            "rating": 6,
            "title": "Zu gut",
            "comment": "Sechs Sterne"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreadable_ratings_are_bad_request() {
    let app = test_app().await;
    let (_, kebab_id) = setup_kebab(&app).await;
    let alice = setup_user(&app, "alice").await;
    let uri = format!("/api/review?userId={alice}");

    for rating in [json!(70000), json!(-65531), json!(4.5), json!("five")] {
        let (status, _) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({
                "kebabVariantId": kebab_id,
                "rating": rating,
                "title": "Hmm",
                "comment": "Komische Zahl"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "rating {rating}");
    }

    let (_, kebab) = send(&app, Method::GET, &format!("/api/kebabs/{kebab_id}"), None).await;
    assert_eq!(kebab["averageRating"], 0.0);
}

#[tokio::test]
async fn unreadable_bodies_are_bad_request() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/places")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": \"Imren\""))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/places",
        Some(json!({
            "name": "Imren",
            "address": "Karl-Marx-Straße 75",
            "city": "Berlin",
            "priceRange": "FREE"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/api/users", Some(json!({ "username": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sauce_and_ingredient_options_are_listed() {
    let app = test_app().await;

    let (status, sauces) = send(&app, Method::GET, "/api/sauces", None).await;
    assert_eq!(status, StatusCode::OK);
    let sauces = sauces.as_array().unwrap();
    assert_eq!(sauces.len(), 3);
    assert!(sauces.iter().any(|s| s["code"] == "GARLIC" && s["nameEn"] == "Garlic Sauce"));

    let (status, ingredients) = send(&app, Method::GET, "/api/ingredients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ingredients.as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn unknown_ids_and_routes_are_not_found() {
    let app = test_app().await;
    let missing = uuid::Uuid::new_v4();

    let (status, _) = send(&app, Method::GET, &format!("/api/places/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &format!("/api/kebabs/place/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/users/username/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn kebab_filters_and_delete() {
    let app = test_app().await;
    let (place_id, kebab_id) = setup_kebab(&app).await;

    let (_, spicy) = send(&app, Method::GET, "/api/kebabs?spicy=true", None).await;
    assert_eq!(spicy.as_array().unwrap().len(), 1);
    let (_, veggie) = send(&app, Method::GET, "/api/kebabs?vegetarian=true", None).await;
    assert!(veggie.as_array().unwrap().is_empty());

    let (status, by_place) =
        send(&app, Method::GET, &format!("/api/kebabs/place/{place_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_place[0]["sauces"][0], "Knoblauchsauce");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/kebabs/{kebab_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/api/kebabs/{kebab_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_update_and_lookup() {
    let app = test_app().await;
    let alice = setup_user(&app, "alice").await;
    setup_user(&app, "bob").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/users/{alice}"),
        Some(json!({ "username": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, user) = send(
        &app,
        Method::PUT,
        &format!("/api/users/{alice}"),
        Some(json!({ "username": "alice_k" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "alice_k");

    let (status, user) = send(&app, Method::GET, "/api/users/username/alice_k", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "alice@example.com");
}
