use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wishlist REST API Service",
        version = "0.1.0",
        description = r#"
# Wishlist REST API

Create wishlists, add items to them, and share them with up to three people.

## Errors

Every failure returns the same JSON body:

```json
{
  "error": "Not Found",
  "message": "Not found: Wishlist with id '42' was not found.",
  "request_id": "3f1c1a4e-6f55-4a2b-9d53-1f0d6c1c8f30",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

Request bodies must be sent with `Content-Type: application/json`; anything
else is rejected with 415.
        "#,
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "wishlists", description = "Wishlist management endpoints"),
        (name = "items", description = "Items within a wishlist"),
    ),
    paths(
        crate::handlers::wishlists::list_wishlists,
        crate::handlers::wishlists::create_wishlist,
        crate::handlers::wishlists::get_wishlist,
        crate::handlers::wishlists::update_wishlist,
        crate::handlers::wishlists::delete_wishlist,
        crate::handlers::wishlists::toggle_shared,
        crate::handlers::wishlists::reset_wishlists,

        crate::handlers::items::list_items,
        crate::handlers::items::create_item,
        crate::handlers::items::get_item,
        crate::handlers::items::update_item,
        crate::handlers::items::delete_item,
    ),
    components(
        schemas(
            crate::models::WishlistPayload,
            crate::models::WishlistResponse,
            crate::models::ItemPayload,
            crate::models::ItemResponse,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

/// Serves the generated document at `/api-docs/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDocV1::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_wishlist_and_item_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Wishlist REST API Service"));
        assert!(json.contains("/wishlists/{wishlist_id}/items/{item_id}"));
        assert!(json.contains("/wishlists/{wishlist_id}/shared"));
        assert!(json.contains("WishlistResponse"));
    }
}
