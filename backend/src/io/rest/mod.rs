//! # REST API Interface Layer
//!
//! HTTP endpoints for the wardrobe application.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: Catalog, wear logging, insights and today's outfit
//! - **Error Handling**: Converting domain errors to HTTP status codes
//! - **Serialization**: JSON request/response handling

pub mod insight_apis;
pub mod item_apis;
pub mod outfit_apis;

use axum::http::StatusCode;

use crate::domain::{ItemNotFound, ItemValidationError};
use crate::providers::WeatherError;

/// Status code for a failed service call
pub fn error_status(err: &anyhow::Error) -> StatusCode {
    if err.downcast_ref::<ItemValidationError>().is_some() {
        StatusCode::BAD_REQUEST
    } else if err.downcast_ref::<ItemNotFound>().is_some() {
        StatusCode::NOT_FOUND
    } else if err.downcast_ref::<WeatherError>().is_some() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
