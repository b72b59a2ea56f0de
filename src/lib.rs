//! Wishlist API Library
//!
//! REST service for wishlists and the items they contain, backed by SeaORM.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod tracing;

use axum::{
    http::HeaderValue,
    response::Json,
    routing::{delete, get, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::db::DbPool;
use crate::repositories::{ItemRepository, WishlistRepository};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub wishlists: Arc<WishlistRepository>,
    pub items: Arc<ItemRepository>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: config::AppConfig) -> Self {
        Self {
            wishlists: Arc::new(WishlistRepository::new(db.clone())),
            items: Arc::new(ItemRepository::new(db.clone())),
            db,
            config,
        }
    }
}

/// Wishlist and item routes
pub fn wishlist_routes() -> Router<AppState> {
    use handlers::{items, wishlists};

    Router::new()
        .route(
            "/wishlists",
            get(wishlists::list_wishlists).post(wishlists::create_wishlist),
        )
        .route("/wishlists/reset", delete(wishlists::reset_wishlists))
        .route(
            "/wishlists/:wishlist_id",
            get(wishlists::get_wishlist)
                .put(wishlists::update_wishlist)
                .delete(wishlists::delete_wishlist),
        )
        .route("/wishlists/:wishlist_id/shared", put(wishlists::toggle_shared))
        .route(
            "/wishlists/:wishlist_id/items",
            get(items::list_items).post(items::create_item),
        )
        .route(
            "/wishlists/:wishlist_id/items/:item_id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
}

/// Builds the CORS layer from configuration
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                ::tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Full application router with middleware applied
pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let health = health::health_routes(state.db.clone());

    Router::new()
        .route("/", get(index))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .merge(wishlist_routes())
        .with_state(state)
        .nest("/health", health)
        .layer(cors)
        .layer(tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
}

/// Service name, version and where to find the collection
async fn index() -> Json<Value> {
    Json(json!({
        "name": "Wishlist REST API Service",
        "version": env!("CARGO_PKG_VERSION"),
        "paths": {
            "wishlists": "/wishlists",
            "openapi": "/api-docs/openapi.json",
            "health": "/health",
        },
    }))
}
