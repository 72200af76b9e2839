//! # Wardrobe Backend
//!
//! Non-UI logic for the wardrobe tracker: the analytic core, the catalog
//! and outfit services, and the REST layer that exposes them.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (analytics, outfit composition, services)
//!     ↓
//! Storage Layer + Providers (in-memory repositories, weather, AI stylist)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod providers;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use chrono::Duration;
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::domain::{
    Clock, RuleBasedAdvisor, StagnationDetector, StylistAdvisor, SystemClock, TodayService,
    WardrobeService,
};
use crate::io::rest::{insight_apis, item_apis, outfit_apis};
use crate::providers::{GeminiStylistClient, OpenWeatherClient, WeatherCache, WeatherService};
use crate::storage::MemoryConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub wardrobe_service: WardrobeService<MemoryConnection>,
    pub today_service: TodayService<MemoryConnection>,
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    info!("Setting up storage");
    let connection = Arc::new(MemoryConnection::new());

    info!("Setting up domain model");
    let wardrobe_service = WardrobeService::new(
        connection,
        clock.clone(),
        StagnationDetector::new(config.stagnant_threshold_days),
    );

    let weather_client = OpenWeatherClient::new(config.weather_api_key.clone(), config.weather_api_url.clone());
    let weather_cache = Arc::new(WeatherCache::new(
        Duration::minutes(config.weather_cache_minutes),
        clock.clone(),
    ));
    let weather_service = WeatherService::new(Arc::new(weather_client), weather_cache);

    let stylist = if config.stylist_enabled() {
        info!("AI stylist enabled with model {}", config.gemini_model);
        let client = GeminiStylistClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
        Some(StylistAdvisor::new(Arc::new(client)))
    } else {
        info!("AI stylist disabled, GEMINI_API_KEY not set");
        None
    };

    let today_service = TodayService::new(
        wardrobe_service.clone(),
        weather_service,
        RuleBasedAdvisor::new(clock),
        stylist,
    );

    AppState {
        wardrobe_service,
        today_service,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;

    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/items", item_apis::router())
        .nest("/insights", insight_apis::router())
        .nest("/outfits", outfit_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}
