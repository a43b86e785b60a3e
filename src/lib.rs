pub mod config;
pub mod db;
pub mod errors;
pub mod http;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

use axum::{Router, http::StatusCode, middleware as axum_middleware};
use config::Config;
use db::{MemoryStore, PgStore, Store, seed::seed_catalog};
use middleware::{cors_layer, create_rate_limiter, rate_limit_middleware};
use state::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower::{ServiceBuilder, limit::ConcurrencyLimitLayer};
use tower_http::trace::TraceLayer;

pub fn build_app(state: AppState, config: &Config) -> Router {
    let rate_limiter = create_rate_limiter(config.rate_limit_per_minute);

    Router::new()
        .merge(http::create_http_routes(state))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(rate_limiter.clone(), req, next)
        }))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests))
                .layer(cors_layer(&config.allowed_origins)),
        )
}

async fn open_store(config: &Config) -> Result<Arc<dyn Store>, errors::AppError> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            store.migrate().await?;
            tracing::info!("Connected to Postgres");
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub async fn start_server() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::load();

    let store = match open_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            panic!("Failed to open store: {}", e);
        }
    };

    if let Err(e) = seed_catalog(store.as_ref()).await {
        tracing::error!("Failed to seed catalog: {}", e);
        panic!("Failed to seed catalog: {}", e);
    }

    let app = build_app(AppState::new(store), &config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("Failed to bind address");

    tracing::info!("Kebab rating server listening on port {}", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
