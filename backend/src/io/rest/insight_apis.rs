//! # REST API for Wardrobe Insights

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};

use super::error_status;
use crate::AppState;

/// Create a router for insight related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_insights))
        .route("/stagnant", get(get_stagnant_items))
}

/// Totals, most worn items and per-item analytics for the whole wardrobe
pub async fn get_insights(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/insights");

    match state.wardrobe_service.insights().await {
        Ok(insights) => (StatusCode::OK, Json(insights)).into_response(),
        Err(e) => {
            error!("Failed to compute insights: {}", e);
            (error_status(&e), "Error computing insights").into_response()
        }
    }
}

/// Items not worn within the stagnation threshold
pub async fn get_stagnant_items(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/insights/stagnant");

    match state.wardrobe_service.stagnant_items().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => {
            error!("Failed to list stagnant items: {}", e);
            (error_status(&e), "Error listing stagnant items").into_response()
        }
    }
}
