//! # REST API for the Closet
//!
//! Endpoints for cataloging items, logging wears and reading per-item
//! analytics.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::{error, info};
use shared::{CreateItemRequest, ItemListRequest, ItemListResponse, LogWearRequest, UpdateItemRequest};

use super::error_status;
use crate::AppState;

/// Create a router for item related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
        .route("/:id/wear", post(log_wear))
        .route("/:id/wear-logs", get(list_wear_logs))
        .route("/:id/analytics", get(get_item_analytics))
}

/// List items, optionally filtered by category and search text
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemListRequest>,
) -> impl IntoResponse {
    info!("GET /api/items - query: {:?}", query);

    match state.wardrobe_service.list_items(&query).await {
        Ok(items) => (StatusCode::OK, Json(ItemListResponse { items })).into_response(),
        Err(e) => {
            error!("Failed to list items: {}", e);
            (error_status(&e), "Error listing items").into_response()
        }
    }
}

pub async fn get_item(State(state): State<AppState>, Path(item_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/items/{}", item_id);

    match state.wardrobe_service.get_item(&item_id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, format!("Item not found: {}", item_id)).into_response(),
        Err(e) => {
            error!("Failed to get item {}: {}", item_id, e);
            (error_status(&e), "Error retrieving item").into_response()
        }
    }
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/items - request: {:?}", request);

    match state.wardrobe_service.create_item(request).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => {
            error!("Failed to create item: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(request): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    info!("PUT /api/items/{} - request: {:?}", item_id, request);

    match state.wardrobe_service.update_item(&item_id, request).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => {
            error!("Failed to update item {}: {}", item_id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete an item together with its wear history
pub async fn delete_item(State(state): State<AppState>, Path(item_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/items/{}", item_id);

    match state.wardrobe_service.delete_item(&item_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to delete item {}: {}", item_id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Log a wear. An empty body means "worn now".
pub async fn log_wear(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    request: Option<Json<LogWearRequest>>,
) -> impl IntoResponse {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    info!("POST /api/items/{}/wear - request: {:?}", item_id, request);

    match state.wardrobe_service.log_wear(&item_id, request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to log wear for {}: {}", item_id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn list_wear_logs(State(state): State<AppState>, Path(item_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/items/{}/wear-logs", item_id);

    match state.wardrobe_service.list_wear_logs(&item_id).await {
        Ok(logs) => (StatusCode::OK, Json(logs)).into_response(),
        Err(e) => {
            error!("Failed to list wear logs for {}: {}", item_id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn get_item_analytics(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/items/{}/analytics", item_id);

    match state.wardrobe_service.item_analytics(&item_id).await {
        Ok(analytics) => (StatusCode::OK, Json(analytics)).into_response(),
        Err(e) => {
            error!("Failed to compute analytics for {}: {}", item_id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
