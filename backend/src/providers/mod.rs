//! # Providers
//!
//! HTTP clients for the third-party services the wardrobe relies on:
//! current weather (OpenWeatherMap) and the optional AI stylist (Gemini).
//! Each client sits behind a trait so the domain layer can be tested with
//! mocks, and each failure mode is a distinct error variant.

pub mod stylist;
pub mod weather;

pub use stylist::{convert_to_closet_items, GeminiStylistClient, StylistApi, StylistError};
pub use weather::{OpenWeatherClient, WeatherApi, WeatherCache, WeatherError, WeatherService};

/// Truncate a response body for inclusion in an error message
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 300;
    if body.chars().count() <= MAX_CHARS {
        return body.to_string();
    }
    let truncated: String = body.chars().take(MAX_CHARS).collect();
    format!("{}...", truncated)
}
