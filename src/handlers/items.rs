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
use crate::models::{Item, ItemPayload, ItemResponse};
use crate::AppState;

/// Optional exact-match filter for a wishlist's items
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemQuery {
    pub name: Option<String>,
}

fn not_found(kind: &str, raw: &str) -> ServiceError {
    ServiceError::NotFound(format!("{} with id '{}' was not found.", kind, raw))
}

fn ids(wishlist_id: &str, item_id: &str) -> Result<(i32, i32), ServiceError> {
    let wishlist = parse_id(wishlist_id).ok_or_else(|| not_found("Wishlist", wishlist_id))?;
    let item = parse_id(item_id).ok_or_else(|| not_found("Item", item_id))?;
    Ok((wishlist, item))
}

#[utoipa::path(
    get,
    path = "/wishlists/{wishlist_id}/items",
    summary = "List items in a wishlist",
    params(
        ("wishlist_id" = i32, Path, description = "Wishlist id"),
        ItemQuery,
    ),
    responses(
        (status = 200, description = "Items of the wishlist", body = [ItemResponse]),
        (status = 404, description = "Wishlist not found", body = ErrorResponse),
    ),
    tag = "items"
)]
#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    Path(wishlist_id): Path<String>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Vec<ItemResponse>>, ServiceError> {
    info!("Request for items in wishlist with id: {}", wishlist_id);
    let id = parse_id(&wishlist_id).ok_or_else(|| not_found("Wishlist", &wishlist_id))?;
    let wishlist = state.wishlists.find_or_404(id).await?;

    let name = query.name.filter(|n| !n.is_empty());
    let items = wishlist
        .items
        .iter()
        .filter(|item| name.as_deref().map_or(true, |n| item.name == n))
        .map(Item::serialize)
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/wishlists/{wishlist_id}/items",
    summary = "Add item to wishlist",
    description = "The path wishlist id wins over any `wishlist_id` in the body.",
    params(("wishlist_id" = i32, Path, description = "Wishlist id")),
    request_body = ItemPayload,
    responses(
        (status = 201, description = "Item created", body = ItemResponse,
            headers(("Location" = String, description = "URL of the new item"))
        ),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 404, description = "Wishlist not found", body = ErrorResponse),
        (status = 415, description = "Body is not application/json", body = ErrorResponse),
    ),
    tag = "items"
)]
#[instrument(skip(state, headers, body))]
pub async fn create_item(
    State(state): State<AppState>,
    Path(wishlist_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    info!("Request to add an item to the wishlist");
    let id = parse_id(&wishlist_id).ok_or_else(|| not_found("Wishlist", &wishlist_id))?;
    check_content_type(&headers, JSON_CONTENT_TYPE)?;

    let mut wishlist = state.wishlists.find_or_404(id).await?;
    let mut item = Item::new();
    item.deserialize(&read_json_body(&body))?;
    wishlist.add_item(item);
    state.wishlists.save(&mut wishlist).await?;

    let item = wishlist.items.last().ok_or_else(|| {
        ServiceError::InternalError("Item missing after save".to_string())
    })?;
    let item_id = item.id.ok_or_else(|| {
        ServiceError::InternalError("Created item has no id".to_string())
    })?;
    info!("Item with ID [{}] added to wishlist [{}].", item_id, id);

    let location = location_url(&headers, &format!("/wishlists/{}/items/{}", id, item_id));
    Ok(created_response(location, item.serialize()))
}

#[utoipa::path(
    get,
    path = "/wishlists/{wishlist_id}/items/{item_id}",
    summary = "Get item",
    params(
        ("wishlist_id" = i32, Path, description = "Wishlist id"),
        ("item_id" = i32, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, description = "No such item in this wishlist", body = ErrorResponse),
    ),
    tag = "items"
)]
#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path((wishlist_id, item_id)): Path<(String, String)>,
) -> Result<Json<ItemResponse>, ServiceError> {
    info!("Request to retrieve item {} from wishlist {}", item_id, wishlist_id);
    let (wishlist_id, item_id) = ids(&wishlist_id, &item_id)?;

    let item = state
        .items
        .find_in_wishlist_or_404(wishlist_id, item_id)
        .await?;
    Ok(Json(item.serialize()))
}

#[utoipa::path(
    put,
    path = "/wishlists/{wishlist_id}/items/{item_id}",
    summary = "Replace item",
    params(
        ("wishlist_id" = i32, Path, description = "Wishlist id"),
        ("item_id" = i32, Path, description = "Item id"),
    ),
    request_body = ItemPayload,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 404, description = "No such item in this wishlist", body = ErrorResponse),
        (status = 415, description = "Body is not application/json", body = ErrorResponse),
    ),
    tag = "items"
)]
#[instrument(skip(state, headers, body))]
pub async fn update_item(
    State(state): State<AppState>,
    Path((wishlist_id, item_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ItemResponse>, ServiceError> {
    info!("Request to update item {} in wishlist {}", item_id, wishlist_id);
    let (wishlist_id, item_id) = ids(&wishlist_id, &item_id)?;
    check_content_type(&headers, JSON_CONTENT_TYPE)?;

    let mut item = state
        .items
        .find_in_wishlist_or_404(wishlist_id, item_id)
        .await?;
    item.deserialize(&read_json_body(&body))?;
    item.id = Some(item_id);
    item.wishlist_id = wishlist_id;
    state.items.save(&mut item).await?;

    Ok(Json(item.serialize()))
}

#[utoipa::path(
    delete,
    path = "/wishlists/{wishlist_id}/items/{item_id}",
    summary = "Delete item",
    params(
        ("wishlist_id" = i32, Path, description = "Wishlist id"),
        ("item_id" = i32, Path, description = "Item id"),
    ),
    responses((status = 204, description = "Item no longer exists in this wishlist")),
    tag = "items"
)]
#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path((wishlist_id, item_id)): Path<(String, String)>,
) -> Result<Response, ServiceError> {
    info!("Request to delete item {} from wishlist {}", item_id, wishlist_id);

    if let Ok((wishlist_id, item_id)) = ids(&wishlist_id, &item_id) {
        if let Some(item) = state.items.find_in_wishlist(wishlist_id, item_id).await? {
            state.items.delete(&item).await?;
        }
    }

    Ok(no_content_response())
}
