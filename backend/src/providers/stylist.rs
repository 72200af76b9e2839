//! AI stylist backed by the Gemini `generateContent` API.
//!
//! The stylist receives a compact inventory ([`ClosetItem`]) plus the current
//! weather and answers with a structured [`OutfitRecommendation`]. Output is
//! constrained with a JSON response schema and validated before it is handed
//! back, so callers only ever see a complete recommendation or an error.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use mockall::automock;
use serde_json::{json, Value};
use shared::{ClosetItem, ClothingItem, OutfitRecommendation, WeatherReading};
use std::time::Duration;

use super::truncate_body;
use crate::domain::analytics::{logs_for, WearLogsByItem};
use crate::domain::date_math::parse_date;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.95;
const TOP_K: u32 = 40;

const SYSTEM_INSTRUCTION: &str = "You are a personal stylist helping someone get more use out of \
the clothes they already own. Build one complete outfit for today from the inventory provided. \
Strongly prefer items that have been worn rarely or not for a long time, as long as they suit \
the weather. Only use item IDs that appear in the inventory. Keep the styling advice short and \
practical, and explain in one or two sentences how the outfit fits the weather.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StylistError {
    #[error("Gemini API key not configured. Set GEMINI_API_KEY.")]
    MissingApiKey,
    #[error("No clothing items available to style")]
    EmptyInventory,
    #[error("Invalid Gemini API key")]
    InvalidApiKey,
    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Unable to reach Gemini: {0}")]
    Network(String),
    #[error("Invalid response format from AI stylist: {0}")]
    MalformedResponse(String),
}

impl StylistError {
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => StylistError::InvalidApiKey,
            _ => {
                let message = serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                    .unwrap_or_else(|| truncate_body(body));
                StylistError::Api { status, message }
            }
        }
    }
}

/// Produces a single styled outfit from an inventory and the weather
#[automock]
#[async_trait]
pub trait StylistApi: Send + Sync {
    async fn recommend(
        &self,
        inventory: &[ClosetItem],
        weather: &WeatherReading,
    ) -> Result<OutfitRecommendation, StylistError>;
}

/// Build the stylist's view of the catalog.
///
/// `last_worn` is the most recent wear date, falling back to the item's
/// creation time when it has never been worn.
pub fn convert_to_closet_items(
    items: &[ClothingItem],
    wear_logs_by_item: &WearLogsByItem,
) -> Vec<ClosetItem> {
    items
        .iter()
        .map(|item| {
            let logs = logs_for(wear_logs_by_item, &item.id);
            let last_worn = logs
                .iter()
                .max_by_key(|log| parse_date(&log.wear_date))
                .map(|log| log.wear_date.clone())
                .unwrap_or_else(|| item.created_at.clone());

            ClosetItem {
                id: item.id.clone(),
                name: item.name.clone(),
                category: item.category,
                wear_count: logs.len(),
                last_worn,
                tags: item.tags.clone(),
            }
        })
        .collect()
}

/// User prompt listing the weather and every inventory item
pub fn build_prompt(inventory: &[ClosetItem], weather: &WeatherReading) -> String {
    let mut prompt = format!(
        "Current weather: {:.0}°F (feels like {:.0}°F), {}, humidity {:.0}%, wind {:.0} mph.\n\n\
         Wardrobe inventory:\n",
        weather.temp, weather.feels_like, weather.description, weather.humidity, weather.wind_speed
    );

    for item in inventory {
        let last_worn = parse_date(&item.last_worn)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| item.last_worn.clone());
        let tags = if item.tags.is_empty() {
            "none".to_string()
        } else {
            item.tags.join(", ")
        };
        prompt.push_str(&format!(
            "- ID: {}, Name: {}, Category: {}, Worn: {} times, Last worn: {}, Tags: {}\n",
            item.id,
            item.name,
            item.category.label(),
            item.wear_count,
            last_worn,
            tags
        ));
    }

    prompt.push_str(
        "\nPick one outfit for today. Return the IDs of the chosen items, \
         styling advice, and the weather rationale.",
    );
    prompt
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "outfit_ids": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "IDs of the inventory items that make up the outfit"
            },
            "styling_advice": {
                "type": "STRING",
                "description": "How to wear the outfit"
            },
            "weather_rationale": {
                "type": "STRING",
                "description": "Why the outfit suits today's weather"
            }
        },
        "required": ["outfit_ids", "styling_advice", "weather_rationale"]
    })
}

/// Full `generateContent` request body
pub fn build_request_body(inventory: &[ClosetItem], weather: &WeatherReading) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{ "text": SYSTEM_INSTRUCTION }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_prompt(inventory, weather) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
            "temperature": TEMPERATURE,
            "topP": TOP_P,
            "topK": TOP_K
        }
    })
}

/// Extract and validate the recommendation from a `generateContent` response
pub fn parse_recommendation(response: &Value) -> Result<OutfitRecommendation, StylistError> {
    let text = response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| StylistError::MalformedResponse("response contained no text".to_string()))?;

    let payload: Value = serde_json::from_str(text)
        .map_err(|e| StylistError::MalformedResponse(format!("output is not JSON: {}", e)))?;

    let outfit_ids = payload["outfit_ids"]
        .as_array()
        .ok_or_else(|| StylistError::MalformedResponse("missing outfit_ids".to_string()))?
        .iter()
        .map(|id| {
            id.as_str()
                .map(str::to_string)
                .ok_or_else(|| StylistError::MalformedResponse("outfit_ids must be strings".to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let required_text = |field: &str| -> Result<String, StylistError> {
        match payload[field].as_str().map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(StylistError::MalformedResponse(format!("missing {}", field))),
        }
    };

    Ok(OutfitRecommendation {
        outfit_ids,
        styling_advice: required_text("styling_advice")?,
        weather_rationale: required_text("weather_rationale")?,
    })
}

/// Gemini-backed stylist
#[derive(Debug, Clone)]
pub struct GeminiStylistClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiStylistClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_GEMINI_API_URL)
    }

    pub fn with_base_url(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl StylistApi for GeminiStylistClient {
    async fn recommend(
        &self,
        inventory: &[ClosetItem],
        weather: &WeatherReading,
    ) -> Result<OutfitRecommendation, StylistError> {
        let api_key = self.api_key.as_deref().ok_or(StylistError::MissingApiKey)?;
        if inventory.is_empty() {
            return Err(StylistError::EmptyInventory);
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(
            "Requesting outfit from {} with {} inventory items",
            self.model,
            inventory.len()
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&build_request_body(inventory, weather))
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                StylistError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StylistError::Network(e.to_string()))?;

        if !status.is_success() {
            let err = StylistError::from_status(status.as_u16(), &body);
            error!("Gemini API error: {}", err);
            return Err(err);
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| StylistError::MalformedResponse(e.to_string()))?;
        let recommendation = parse_recommendation(&value).map_err(|e| {
            warn!("Discarding stylist output: {}", e);
            e
        })?;

        info!(
            "AI stylist picked {} items",
            recommendation.outfit_ids.len()
        );
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::test_support::{days_ago, item, tagged, wear};
    use crate::domain::analytics::group_wear_logs_by_item;
    use shared::Category;

    fn weather() -> WeatherReading {
        WeatherReading {
            temp: 48.6,
            feels_like: 45.2,
            description: "light rain".to_string(),
            icon: "10d".to_string(),
            humidity: 88.0,
            wind_speed: 11.4,
        }
    }

    fn gemini_response(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn test_convert_to_closet_items_uses_latest_wear() {
        let coat = tagged(item("coat", Category::Outerwear, 200.0, 300), &["warm"]);
        let scarf = item("scarf", Category::Accessories, 25.0, 100);
        let logs = vec![wear("coat", 40), wear("coat", 3), wear("coat", 12)];
        let grouped = group_wear_logs_by_item(&[coat.clone(), scarf.clone()], &logs);

        let closet = convert_to_closet_items(&[coat, scarf.clone()], &grouped);

        assert_eq!(closet.len(), 2);
        assert_eq!(closet[0].wear_count, 3);
        assert_eq!(closet[0].last_worn, days_ago(3));
        assert_eq!(closet[0].tags, vec!["warm".to_string()]);
        assert_eq!(closet[1].wear_count, 0);
        assert_eq!(closet[1].last_worn, scarf.created_at);
    }

    #[test]
    fn test_build_prompt_lists_inventory() {
        let inventory = vec![ClosetItem {
            id: "item::1".to_string(),
            name: "Wool Coat".to_string(),
            category: Category::Outerwear,
            wear_count: 2,
            last_worn: "2025-03-01T09:30:00Z".to_string(),
            tags: vec!["warm".to_string(), "formal".to_string()],
        }];

        let prompt = build_prompt(&inventory, &weather());

        assert!(prompt.contains("49°F"));
        assert!(prompt.contains("light rain"));
        assert!(prompt.contains(
            "- ID: item::1, Name: Wool Coat, Category: Outerwear, Worn: 2 times, Last worn: 2025-03-01, Tags: warm, formal"
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = build_request_body(&[], &weather());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            json!(["outfit_ids", "styling_advice", "weather_rationale"])
        );
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("worn rarely"));
    }

    #[test]
    fn test_parse_recommendation() {
        let response = gemini_response(
            r#"{"outfit_ids":["item::1","item::2"],"styling_advice":"Roll the sleeves.","weather_rationale":"Layers for the rain."}"#,
        );
        let parsed = parse_recommendation(&response).unwrap();
        assert_eq!(parsed.outfit_ids, vec!["item::1", "item::2"]);
        assert_eq!(parsed.styling_advice, "Roll the sleeves.");
        assert_eq!(parsed.weather_rationale, "Layers for the rain.");
    }

    #[test]
    fn test_parse_recommendation_rejects_incomplete_output() {
        let cases = [
            json!({ "candidates": [] }),
            gemini_response("not json at all"),
            gemini_response(r#"{"styling_advice":"x","weather_rationale":"y"}"#),
            gemini_response(r#"{"outfit_ids":[1,2],"styling_advice":"x","weather_rationale":"y"}"#),
            gemini_response(r#"{"outfit_ids":[],"styling_advice":"  ","weather_rationale":"y"}"#),
            gemini_response(r#"{"outfit_ids":[],"styling_advice":"x"}"#),
        ];
        for case in cases {
            assert!(matches!(
                parse_recommendation(&case),
                Err(StylistError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_error_from_status() {
        assert_eq!(StylistError::from_status(401, ""), StylistError::InvalidApiKey);
        assert_eq!(StylistError::from_status(403, ""), StylistError::InvalidApiKey);
        assert_eq!(
            StylistError::from_status(
                429,
                r#"{"error":{"code":429,"message":"Resource exhausted","status":"RESOURCE_EXHAUSTED"}}"#
            ),
            StylistError::Api {
                status: 429,
                message: "Resource exhausted".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_key_and_empty_inventory() {
        let unconfigured = GeminiStylistClient::new(None, DEFAULT_GEMINI_MODEL);
        assert_eq!(
            unconfigured.recommend(&[], &weather()).await,
            Err(StylistError::MissingApiKey)
        );

        let blank = GeminiStylistClient::new(Some("  ".to_string()), DEFAULT_GEMINI_MODEL);
        assert_eq!(
            blank.recommend(&[], &weather()).await,
            Err(StylistError::MissingApiKey)
        );

        let configured = GeminiStylistClient::new(Some("key".to_string()), DEFAULT_GEMINI_MODEL);
        assert_eq!(configured.model(), DEFAULT_GEMINI_MODEL);
        assert_eq!(
            configured.recommend(&[], &weather()).await,
            Err(StylistError::EmptyInventory)
        );
    }
}
