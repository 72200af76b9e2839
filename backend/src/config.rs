//! Server configuration read from the environment.
//!
//! Missing values fall back to defaults. Malformed numbers fall back too,
//! with a warning.

use log::warn;
use std::env;

use crate::domain::stagnation::DEFAULT_STAGNANT_THRESHOLD_DAYS;
use crate::providers::stylist::DEFAULT_GEMINI_MODEL;
use crate::providers::weather::{DEFAULT_CACHE_MINUTES, DEFAULT_WEATHER_API_URL};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `WARDROBE_BIND_ADDR`
    pub bind_addr: String,
    /// `WEATHER_API_KEY`
    pub weather_api_key: Option<String>,
    /// `WEATHER_API_URL`
    pub weather_api_url: String,
    /// `WEATHER_CACHE_MINUTES`
    pub weather_cache_minutes: i64,
    /// `GEMINI_API_KEY`. The AI stylist is disabled without it.
    pub gemini_api_key: Option<String>,
    /// `GEMINI_MODEL`
    pub gemini_model: String,
    /// `STAGNANT_THRESHOLD_DAYS`
    pub stagnant_threshold_days: i64,
    /// `WARDROBE_CORS_ORIGIN`
    pub cors_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |key: &str, default: i64| match text(key) {
            None => default,
            Some(raw) => match raw.parse::<i64>() {
                Ok(value) if value > 0 => value,
                _ => {
                    warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
                    default
                }
            },
        };

        Self {
            bind_addr: text("WARDROBE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            weather_api_key: text("WEATHER_API_KEY"),
            weather_api_url: text("WEATHER_API_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string()),
            weather_cache_minutes: number("WEATHER_CACHE_MINUTES", DEFAULT_CACHE_MINUTES),
            gemini_api_key: text("GEMINI_API_KEY"),
            gemini_model: text("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            stagnant_threshold_days: number("STAGNANT_THRESHOLD_DAYS", DEFAULT_STAGNANT_THRESHOLD_DAYS),
            cors_origin: text("WARDROBE_CORS_ORIGIN")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        }
    }

    pub fn stylist_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}
