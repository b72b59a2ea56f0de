use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Json, Response},
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::IntoParams;

use super::common::{
    check_content_type, created_response, location_url, no_content_response, parse_id,
    read_json_body, JSON_CONTENT_TYPE,
};
use crate::errors::{ErrorResponse, ServiceError};
use crate::models::{Wishlist, WishlistPayload, WishlistResponse};
use crate::AppState;

/// Optional exact-match filters for the wishlist collection
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WishlistQuery {
    /// Only wishlists with exactly this name; wins over `email`
    pub name: Option<String>,
    /// Only wishlists owned by exactly this email
    pub email: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[utoipa::path(
    get,
    path = "/wishlists",
    summary = "List wishlists",
    params(WishlistQuery),
    responses(
        (status = 200, description = "Wishlists matching the filter", body = [WishlistResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "wishlists"
)]
#[instrument(skip(state))]
pub async fn list_wishlists(
    State(state): State<AppState>,
    Query(query): Query<WishlistQuery>,
) -> Result<Json<Vec<WishlistResponse>>, ServiceError> {
    info!("Request for wishlists");

    let wishlists = if let Some(name) = non_empty(query.name) {
        state.wishlists.find_by_name(&name).await?
    } else if let Some(email) = non_empty(query.email) {
        state.wishlists.find_by_email(&email).await?
    } else {
        state.wishlists.all().await?
    };

    info!("Returning {} wishlists", wishlists.len());
    Ok(Json(wishlists.iter().map(Wishlist::serialize).collect()))
}

#[utoipa::path(
    post,
    path = "/wishlists",
    summary = "Create wishlist",
    request_body = WishlistPayload,
    responses(
        (status = 201, description = "Wishlist created", body = WishlistResponse,
            headers(("Location" = String, description = "URL of the new wishlist"))
        ),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 415, description = "Body is not application/json", body = ErrorResponse),
    ),
    tag = "wishlists"
)]
#[instrument(skip(state, headers, body))]
pub async fn create_wishlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    info!("Request to create a wishlist");
    check_content_type(&headers, JSON_CONTENT_TYPE)?;

    let mut wishlist = Wishlist::new();
    wishlist.deserialize(&read_json_body(&body))?;
    state.wishlists.create(&mut wishlist).await?;

    let id = wishlist.id.ok_or_else(|| {
        ServiceError::InternalError("Created wishlist has no id".to_string())
    })?;
    info!("Wishlist with ID [{}] created.", id);

    let location = location_url(&headers, &format!("/wishlists/{}", id));
    Ok(created_response(location, wishlist.serialize()))
}

#[utoipa::path(
    get,
    path = "/wishlists/{wishlist_id}",
    summary = "Get wishlist",
    params(("wishlist_id" = i32, Path, description = "Wishlist id")),
    responses(
        (status = 200, description = "Wishlist found", body = WishlistResponse),
        (status = 404, description = "Wishlist not found", body = ErrorResponse),
    ),
    tag = "wishlists"
)]
#[instrument(skip(state))]
pub async fn get_wishlist(
    State(state): State<AppState>,
    Path(wishlist_id): Path<String>,
) -> Result<Json<WishlistResponse>, ServiceError> {
    info!("Request to retrieve a Wishlist with id: {}", wishlist_id);
    let id = parse_id(&wishlist_id).ok_or_else(|| not_found_raw(&wishlist_id))?;

    let wishlist = state.wishlists.find_or_404(id).await?;
    Ok(Json(wishlist.serialize()))
}

#[utoipa::path(
    put,
    path = "/wishlists/{wishlist_id}",
    summary = "Replace wishlist",
    description = "Overwrites the user-editable fields. `id` and `shared` in the body are ignored.",
    params(("wishlist_id" = i32, Path, description = "Wishlist id")),
    request_body = WishlistPayload,
    responses(
        (status = 200, description = "Wishlist updated", body = WishlistResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 404, description = "Wishlist not found", body = ErrorResponse),
        (status = 415, description = "Body is not application/json", body = ErrorResponse),
    ),
    tag = "wishlists"
)]
#[instrument(skip(state, headers, body))]
pub async fn update_wishlist(
    State(state): State<AppState>,
    Path(wishlist_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WishlistResponse>, ServiceError> {
    info!("Request to update wishlist with id: {}", wishlist_id);
    let id = parse_id(&wishlist_id).ok_or_else(|| not_found_raw(&wishlist_id))?;
    check_content_type(&headers, JSON_CONTENT_TYPE)?;

    let mut wishlist = state.wishlists.find_or_404(id).await?;
    wishlist.deserialize(&read_json_body(&body))?;
    wishlist.id = Some(id);
    state.wishlists.save(&mut wishlist).await?;

    Ok(Json(wishlist.serialize()))
}

#[utoipa::path(
    delete,
    path = "/wishlists/{wishlist_id}",
    summary = "Delete wishlist",
    description = "Removes the wishlist and its items. Deleting a missing wishlist also returns 204.",
    params(("wishlist_id" = i32, Path, description = "Wishlist id")),
    responses((status = 204, description = "Wishlist no longer exists")),
    tag = "wishlists"
)]
#[instrument(skip(state))]
pub async fn delete_wishlist(
    State(state): State<AppState>,
    Path(wishlist_id): Path<String>,
) -> Result<Response, ServiceError> {
    info!("Request to delete wishlist with id: {}", wishlist_id);

    if let Some(id) = parse_id(&wishlist_id) {
        if let Some(wishlist) = state.wishlists.find(id).await? {
            state.wishlists.delete(&wishlist).await?;
            info!("Wishlist with ID [{}] delete complete.", id);
        }
    }

    Ok(no_content_response())
}

#[utoipa::path(
    put,
    path = "/wishlists/{wishlist_id}/shared",
    summary = "Toggle shared flag",
    params(("wishlist_id" = i32, Path, description = "Wishlist id")),
    responses(
        (status = 200, description = "Wishlist with its shared flag flipped", body = WishlistResponse),
        (status = 404, description = "Wishlist not found", body = ErrorResponse),
    ),
    tag = "wishlists"
)]
#[instrument(skip(state))]
pub async fn toggle_shared(
    State(state): State<AppState>,
    Path(wishlist_id): Path<String>,
) -> Result<Json<WishlistResponse>, ServiceError> {
    info!("Request to toggle sharing for wishlist with id: {}", wishlist_id);
    let id = parse_id(&wishlist_id).ok_or_else(|| not_found_raw(&wishlist_id))?;

    let mut wishlist = state.wishlists.find_or_404(id).await?;
    let shared = wishlist.toggle_shared();
    state.wishlists.save(&mut wishlist).await?;
    info!("Wishlist with ID [{}] shared is now {}.", id, shared);

    Ok(Json(wishlist.serialize()))
}

#[utoipa::path(
    delete,
    path = "/wishlists/reset",
    summary = "Remove all wishlists",
    description = "Test support: deletes every wishlist and item.",
    responses((status = 204, description = "Store emptied")),
    tag = "wishlists"
)]
#[instrument(skip(state))]
pub async fn reset_wishlists(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let removed = state.wishlists.delete_all().await?;
    info!("Removed {} wishlists", removed);
    Ok(no_content_response())
}

fn not_found_raw(raw: &str) -> ServiceError {
    ServiceError::NotFound(format!("Wishlist with id '{}' was not found.", raw))
}
