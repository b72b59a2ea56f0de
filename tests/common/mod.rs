use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use fake::{faker::name::en::FirstName, Fake};
use rand::seq::SliceRandom;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wishlist_api::{app_router, config::AppConfig, db, AppState};

/// Helper harness for spinning up the application backed by a throwaway SQLite file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with a fresh, migrated database.
    pub async fn new() -> Self {
        let db_dir = TempDir::new().expect("create temp dir for test database");
        let db_path = db_dir.path().join("wishlists_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());

        Self {
            router,
            state,
            _db_dir: db_dir,
        }
    }

    /// Send a request; a JSON body is sent as `application/json`.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("host", "localhost");

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    /// Send raw bytes with an explicit (or absent) content type.
    #[allow(dead_code)]
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        body: &'static str,
        content_type: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        self.send(builder.body(Body::from(body)).expect("failed to build request"))
            .await
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// POSTs a wishlist and returns the created representation.
    #[allow(dead_code)]
    pub async fn create_wishlist(&self, payload: Value) -> Value {
        let response = self
            .request(Method::POST, "/wishlists", Some(payload))
            .await;
        assert_eq!(response.status(), 201, "wishlist creation failed");
        read_json(response).await
    }

    /// POSTs an item under `wishlist_id` and returns the created representation.
    #[allow(dead_code)]
    pub async fn create_item(&self, wishlist_id: i64, payload: Value) -> Value {
        let response = self
            .request(
                Method::POST,
                &format!("/wishlists/{}/items", wishlist_id),
                Some(payload),
            )
            .await;
        assert_eq!(response.status(), 201, "item creation failed");
        read_json(response).await
    }
}

/// Reads the whole body as JSON.
pub async fn read_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}

const OWNERS: [&str; 6] = ["Pratyush", "Cata", "Kevin", "Colin", "John", "Rofrano"];

/// Builds random but valid wishlist payloads.
pub struct WishlistFactory;

impl WishlistFactory {
    pub fn payload() -> Value {
        let mut rng = rand::thread_rng();
        let owner = OWNERS.choose(&mut rng).copied().unwrap_or("Kevin");
        let friend = || FirstName().fake::<String>();

        json!({
            "name": format!("{}'s wishlist", owner),
            "email": format!("{}@stern.nyu.edu", owner.to_lowercase()),
            "shared_with1": friend(),
            "shared_with2": friend(),
            "shared_with3": friend(),
        })
    }

    #[allow(dead_code)]
    pub fn batch(count: usize) -> Vec<Value> {
        (0..count).map(|_| Self::payload()).collect()
    }
}

/// Builds random but valid item payloads.
#[allow(dead_code)]
pub struct ItemFactory;

#[allow(dead_code)]
impl ItemFactory {
    pub fn payload(wishlist_id: i64) -> Value {
        let mut rng = rand::thread_rng();
        let product = ["Kettle", "Headphones", "Backpack", "Desk lamp", "Sneakers"]
            .choose(&mut rng)
            .copied()
            .unwrap_or("Kettle");
        let sku_number: u32 = (1000u32..9999).fake();

        json!({
            "wishlist_id": wishlist_id,
            "name": product,
            "sku": format!("SKU-{}", sku_number),
            "description": format!("A {} for the house", product.to_lowercase()),
            "quantity": format!("{}", (1u8..5).fake::<u8>()),
        })
    }
}
