//! A small blog: published-post listing and detail pages, share-by-email,
//! and a JSON API for authors to manage their posts.

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod mail;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod share;
pub mod slug;
pub mod states;
pub mod views;

pub use config::AppConfig;
pub use states::AppState;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the router
pub fn app(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_check))
        .merge(routes::blog_routes())
        .merge(routes::editor_routes())
        .fallback(|| async { views::not_found_response() })
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
