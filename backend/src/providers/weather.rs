//! Current-weather lookup with a time-boxed cache.
//!
//! [`OpenWeatherClient`] talks to the OpenWeatherMap "current weather"
//! endpoint in imperial units. [`WeatherService`] puts a [`WeatherCache`] in
//! front of any [`WeatherApi`] so repeated lookups within the freshness
//! window do not hit the network. The cache keeps a single reading and serves
//! it while fresh regardless of the coordinates asked for.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info};
use mockall::automock;
use serde::Deserialize;
use shared::WeatherReading;
use std::sync::{Arc, Mutex};

use super::truncate_body;
use crate::domain::clock::Clock;

pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_CACHE_MINUTES: i64 = 30;

/// Value some setups leave in place of a real key
const PLACEHOLDER_API_KEY: &str = "your_key_here";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather API key not configured. Set WEATHER_API_KEY.")]
    MissingApiKey,
    #[error("Invalid weather API key. Check your OpenWeatherMap API key.")]
    InvalidApiKey,
    #[error("Location not found")]
    LocationNotFound,
    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Unable to connect to weather service: {0}")]
    Network(String),
    #[error("Unexpected weather response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    /// Classify a non-success HTTP response
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => WeatherError::InvalidApiKey,
            404 => WeatherError::LocationNotFound,
            _ => {
                let message = serde_json::from_str::<serde_json::Value>(body)
                    .ok()
                    .and_then(|v| v["message"].as_str().map(str::to_string))
                    .unwrap_or_else(|| {
                        if body.trim().is_empty() {
                            "Unknown error".to_string()
                        } else {
                            truncate_body(body)
                        }
                    });
                WeatherError::Api { status, message }
            }
        }
    }
}

/// Source of current weather readings
#[automock]
#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn fetch_current(&self, lat: f64, lon: f64) -> Result<WeatherReading, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    wind: Option<WindBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: Option<f64>,
}

/// Map an OpenWeatherMap current-weather body to a reading
pub fn parse_weather_response(body: &str) -> Result<WeatherReading, WeatherError> {
    let response: CurrentWeatherResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

    let condition = response
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MalformedResponse("no weather conditions".to_string()))?;

    Ok(WeatherReading {
        temp: response.main.temp,
        feels_like: response.main.feels_like,
        description: condition.description,
        icon: condition.icon,
        humidity: response.main.humidity,
        wind_speed: response.wind.and_then(|w| w.speed).unwrap_or(0.0),
    })
}

/// OpenWeatherMap client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn usable_key(&self) -> Result<&str, WeatherError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(WeatherError::MissingApiKey),
        }
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn fetch_current(&self, lat: f64, lon: f64) -> Result<WeatherReading, WeatherError> {
        let api_key = self.usable_key()?;
        let url = format!("{}/weather", self.base_url);
        debug!("Fetching current weather for ({}, {})", lat, lon);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "imperial".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Weather request failed: {}", e);
                WeatherError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        if !status.is_success() {
            let err = WeatherError::from_status(status.as_u16(), &body);
            error!("Weather API error: {}", err);
            return Err(err);
        }

        parse_weather_response(&body)
    }
}

#[derive(Debug, Clone)]
struct CachedReading {
    reading: WeatherReading,
    fetched_at: DateTime<Utc>,
}

/// Single-entry weather cache with an injected clock
pub struct WeatherCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: Mutex<Option<CachedReading>>,
}

impl WeatherCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: Mutex::new(None),
        }
    }

    /// The cached reading, if it is younger than the TTL
    pub fn get(&self) -> Option<WeatherReading> {
        let now = self.clock.now();
        let entry = self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entry
            .as_ref()
            .filter(|cached| now - cached.fetched_at < self.ttl)
            .map(|cached| cached.reading.clone())
    }

    pub fn store(&self, reading: WeatherReading) {
        let fetched_at = self.clock.now();
        let mut entry = self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *entry = Some(CachedReading { reading, fetched_at });
    }

    pub fn clear(&self) {
        let mut entry = self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *entry = None;
    }
}

/// Weather lookups served from cache while fresh
#[derive(Clone)]
pub struct WeatherService {
    api: Arc<dyn WeatherApi>,
    cache: Arc<WeatherCache>,
}

impl WeatherService {
    pub fn new(api: Arc<dyn WeatherApi>, cache: Arc<WeatherCache>) -> Self {
        Self { api, cache }
    }

    pub async fn get_current_weather(&self, lat: f64, lon: f64) -> Result<WeatherReading, WeatherError> {
        if let Some(reading) = self.cache.get() {
            debug!("Serving cached weather reading");
            return Ok(reading);
        }

        let reading = self.api.fetch_current(lat, lon).await?;
        info!(
            "Fetched weather: {:.1}°F, {}",
            reading.temp, reading.description
        );
        self.cache.store(reading.clone());
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use chrono::TimeZone;

    const SAMPLE_BODY: &str = r#"{
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 52.3, "feels_like": 49.8, "temp_min": 50.0, "temp_max": 54.0, "pressure": 1012, "humidity": 81},
        "wind": {"speed": 8.05, "deg": 240},
        "name": "Portland"
    }"#;

    fn reading(temp: f64) -> WeatherReading {
        WeatherReading {
            temp,
            feels_like: temp,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            humidity: 40.0,
            wind_speed: 2.0,
        }
    }

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap())
    }

    #[test]
    fn test_parse_weather_response() {
        let parsed = parse_weather_response(SAMPLE_BODY).unwrap();
        assert_eq!(parsed.temp, 52.3);
        assert_eq!(parsed.feels_like, 49.8);
        assert_eq!(parsed.description, "light rain");
        assert_eq!(parsed.icon, "10d");
        assert_eq!(parsed.humidity, 81.0);
        assert_eq!(parsed.wind_speed, 8.05);
    }

    #[test]
    fn test_parse_weather_response_without_wind() {
        let body = r#"{"weather":[{"description":"haze","icon":"50d"}],"main":{"temp":70,"feels_like":71,"humidity":30}}"#;
        assert_eq!(parse_weather_response(body).unwrap().wind_speed, 0.0);
    }

    #[test]
    fn test_parse_weather_response_malformed() {
        assert!(matches!(
            parse_weather_response("not json"),
            Err(WeatherError::MalformedResponse(_))
        ));
        let no_conditions = r#"{"weather":[],"main":{"temp":70,"feels_like":71,"humidity":30}}"#;
        assert!(matches!(
            parse_weather_response(no_conditions),
            Err(WeatherError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_error_from_status() {
        assert_eq!(WeatherError::from_status(401, ""), WeatherError::InvalidApiKey);
        assert_eq!(WeatherError::from_status(404, "{}"), WeatherError::LocationNotFound);
        assert_eq!(
            WeatherError::from_status(429, r#"{"cod":429,"message":"rate limited"}"#),
            WeatherError::Api {
                status: 429,
                message: "rate limited".to_string()
            }
        );
        assert_eq!(
            WeatherError::from_status(500, ""),
            WeatherError::Api {
                status: 500,
                message: "Unknown error".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_or_placeholder_key() {
        for key in [None, Some("".to_string()), Some("  ".to_string()), Some("your_key_here".to_string())] {
            let client = OpenWeatherClient::new(key, DEFAULT_WEATHER_API_URL);
            assert_eq!(
                client.fetch_current(45.5, -122.6).await,
                Err(WeatherError::MissingApiKey)
            );
        }
    }

    #[tokio::test]
    async fn test_cache_serves_fresh_reading_without_refetch() {
        let clock = clock();
        let mut api = MockWeatherApi::new();
        api.expect_fetch_current()
            .times(1)
            .returning(|_, _| Ok(reading(55.0)));

        let cache = Arc::new(WeatherCache::new(
            Duration::minutes(DEFAULT_CACHE_MINUTES),
            Arc::new(clock.clone()),
        ));
        let service = WeatherService::new(Arc::new(api), cache);

        assert_eq!(service.get_current_weather(1.0, 2.0).await.unwrap().temp, 55.0);
        clock.advance(Duration::minutes(29));
        assert_eq!(service.get_current_weather(1.0, 2.0).await.unwrap().temp, 55.0);
    }

    #[tokio::test]
    async fn test_cache_expires_after_ttl() {
        let clock = clock();
        let mut api = MockWeatherApi::new();
        let mut temps = vec![80.0, 55.0];
        api.expect_fetch_current()
            .times(2)
            .returning(move |_, _| Ok(reading(temps.pop().unwrap_or(0.0))));

        let cache = Arc::new(WeatherCache::new(Duration::minutes(30), Arc::new(clock.clone())));
        let service = WeatherService::new(Arc::new(api), cache);

        assert_eq!(service.get_current_weather(1.0, 2.0).await.unwrap().temp, 55.0);
        clock.advance(Duration::minutes(30));
        assert_eq!(service.get_current_weather(1.0, 2.0).await.unwrap().temp, 80.0);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let clock = clock();
        let mut api = MockWeatherApi::new();
        let mut calls = 0;
        api.expect_fetch_current().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(WeatherError::Network("connection reset".to_string()))
            } else {
                Ok(reading(61.0))
            }
        });

        let cache = Arc::new(WeatherCache::new(Duration::minutes(30), Arc::new(clock)));
        let service = WeatherService::new(Arc::new(api), cache.clone());

        assert!(matches!(
            service.get_current_weather(1.0, 2.0).await,
            Err(WeatherError::Network(_))
        ));
        assert!(cache.get().is_none());
        assert_eq!(service.get_current_weather(1.0, 2.0).await.unwrap().temp, 61.0);
    }

    #[test]
    fn test_cache_clear() {
        let cache = WeatherCache::new(Duration::minutes(30), Arc::new(clock()));
        cache.store(reading(70.0));
        assert!(cache.get().is_some());
        cache.clear();
        assert!(cache.get().is_none());
    }
}
