//! # REST API for Today's Outfit

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};
use shared::TodayOutfitsRequest;

use super::error_status;
use crate::AppState;

/// Create a router for outfit related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/today", get(get_today_outfits))
}

/// Weather for the given coordinates with rule-based and AI outfit picks
pub async fn get_today_outfits(
    State(state): State<AppState>,
    Query(query): Query<TodayOutfitsRequest>,
) -> impl IntoResponse {
    info!("GET /api/outfits/today - query: {:?}", query);

    match state.today_service.today_outfits(&query).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to build today's outfits: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{app, get, parse, send, weather_reading};
    use crate::domain::analytics::test_support::{item, wear};
    use crate::providers::weather::{MockWeatherApi, WeatherError};
    use axum::http::StatusCode;
    use shared::{Category, TodayOutfitsResponse};

    #[tokio::test]
    async fn test_today_outfits() {
        let mut weather_api = MockWeatherApi::new();
        weather_api
            .expect_fetch_current()
            .withf(|lat, lon| *lat == 47.6 && *lon == -122.3)
            .times(1)
            .returning(|_, _| Ok(weather_reading()));
        let app = app(
            vec![
                item("tee", Category::Tops, 40.0, 100),
                item("jeans", Category::Bottoms, 80.0, 100),
            ],
            (1..=4).map(|d| wear("jeans", d)).collect(),
            weather_api,
        );

        let (status, body) = send(app, get("/api/outfits/today?lat=47.6&lon=-122.3")).await;

        assert_eq!(status, StatusCode::OK);
        let response: TodayOutfitsResponse = parse(&body);
        assert_eq!(response.weather.description, "clear sky");
        assert_eq!(response.suggestions.len(), 1);
        assert_eq!(response.suggestions[0].avg_cost_per_wear, 30.0);
        assert_eq!(response.ai_recommendation, None);
    }

    #[tokio::test]
    async fn test_weather_unavailable() {
        let mut weather_api = MockWeatherApi::new();
        weather_api
            .expect_fetch_current()
            .returning(|_, _| Err(WeatherError::MissingApiKey));
        let app = app(vec![], vec![], weather_api);

        let (status, body) = send(app, get("/api/outfits/today?lat=1&lon=2")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(String::from_utf8(body).unwrap().contains("WEATHER_API_KEY"));
    }

    #[tokio::test]
    async fn test_missing_coordinates() {
        let app = app(vec![], vec![], MockWeatherApi::new());

        let (status, _) = send(app, get("/api/outfits/today?lat=1")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
