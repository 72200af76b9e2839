//! Today's outfit: current weather plus both recommendation paths.
//!
//! The rule-based suggestions and the AI stylist run independently over the
//! same wardrobe snapshot. A weather failure stops everything; a stylist
//! failure only ever shows up as `ai_error`.

use anyhow::Result;
use log::{info, warn};
use shared::{TodayOutfitsRequest, TodayOutfitsResponse};

use crate::domain::outfit_advisor::{OutfitAdvisor, RuleBasedAdvisor, StylistAdvisor};
use crate::domain::wardrobe_service::WardrobeService;
use crate::providers::weather::WeatherService;
use crate::storage::Connection;

#[derive(Clone)]
pub struct TodayService<C: Connection> {
    wardrobe: WardrobeService<C>,
    weather: WeatherService,
    rules: RuleBasedAdvisor,
    stylist: Option<StylistAdvisor>,
}

impl<C: Connection> TodayService<C> {
    /// `stylist` is `None` when no AI stylist is configured
    pub fn new(
        wardrobe: WardrobeService<C>,
        weather: WeatherService,
        rules: RuleBasedAdvisor,
        stylist: Option<StylistAdvisor>,
    ) -> Self {
        Self {
            wardrobe,
            weather,
            rules,
            stylist,
        }
    }

    pub async fn today_outfits(&self, request: &TodayOutfitsRequest) -> Result<TodayOutfitsResponse> {
        let weather = self
            .weather
            .get_current_weather(request.lat, request.lon)
            .await?;

        let (items, wear_logs_by_item) = self.wardrobe.load_wardrobe().await?;
        let suggestions = self.rules.advise(&items, &weather, &wear_logs_by_item).await?;
        info!("Composed {} outfit suggestions", suggestions.len());

        let (ai_recommendation, ai_error) = match &self.stylist {
            Some(stylist) => match stylist.advise(&items, &weather, &wear_logs_by_item).await {
                Ok(recommendation) => (Some(recommendation), None),
                Err(e) => {
                    warn!("AI stylist unavailable: {}", e);
                    (None, Some(e.to_string()))
                }
            },
            None => (None, None),
        };

        Ok(TodayOutfitsResponse {
            weather,
            suggestions,
            ai_recommendation,
            ai_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::test_support::{item, now, tagged, wear};
    use crate::domain::clock::{Clock, FixedClock};
    use crate::domain::stagnation::StagnationDetector;
    use crate::providers::stylist::{MockStylistApi, StylistError};
    use crate::providers::weather::{MockWeatherApi, WeatherCache, WeatherError};
    use crate::storage::MemoryConnection;
    use chrono::Duration;
    use shared::{Category, ClothingItem, OutfitRecommendation, WeatherReading, WearLog};
    use std::sync::Arc;

    fn reading() -> WeatherReading {
        WeatherReading {
            temp: 50.0,
            feels_like: 47.0,
            description: "clear".to_string(),
            icon: "01d".to_string(),
            humidity: 55.0,
            wind_speed: 4.0,
        }
    }

    fn wardrobe() -> (Vec<ClothingItem>, Vec<WearLog>) {
        let tee = item("tee", Category::Tops, 40.0, 100);
        let jeans = item("jeans", Category::Bottoms, 80.0, 100);
        let logs = (1..=4).map(|d| wear("jeans", d * 3)).collect();
        (vec![tee, jeans], logs)
    }

    fn today_service(
        items: Vec<ClothingItem>,
        logs: Vec<WearLog>,
        weather_api: MockWeatherApi,
        stylist: Option<MockStylistApi>,
    ) -> TodayService<MemoryConnection> {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now()));
        let connection = Arc::new(MemoryConnection::with_data(items, logs));
        let wardrobe = WardrobeService::new(connection, clock.clone(), StagnationDetector::default());
        let cache = Arc::new(WeatherCache::new(Duration::minutes(30), clock.clone()));
        let weather = WeatherService::new(Arc::new(weather_api), cache);
        let stylist = stylist.map(|api| StylistAdvisor::new(Arc::new(api)));
        TodayService::new(wardrobe, weather, RuleBasedAdvisor::new(clock), stylist)
    }

    fn request() -> TodayOutfitsRequest {
        TodayOutfitsRequest { lat: 40.7, lon: -74.0 }
    }

    fn weather_ok() -> MockWeatherApi {
        let mut api = MockWeatherApi::new();
        api.expect_fetch_current().returning(|_, _| Ok(reading()));
        api
    }

    #[tokio::test]
    async fn test_rule_based_only_without_stylist() {
        let (items, logs) = wardrobe();
        let service = today_service(items, logs, weather_ok(), None);

        let response = service.today_outfits(&request()).await.unwrap();

        assert_eq!(response.weather, reading());
        assert_eq!(response.suggestions.len(), 1);
        let outfit = &response.suggestions[0];
        assert_eq!(outfit.reason, "Perfect for the cold weather");
        assert_eq!(outfit.avg_cost_per_wear, 30.0);
        assert_eq!(response.ai_recommendation, None);
        assert_eq!(response.ai_error, None);
    }

    #[tokio::test]
    async fn test_stylist_recommendation_included() {
        let (items, logs) = wardrobe();
        let mut stylist = MockStylistApi::new();
        stylist.expect_recommend().times(1).returning(|inventory, _| {
            Ok(OutfitRecommendation {
                outfit_ids: inventory.iter().map(|i| i.id.clone()).collect(),
                styling_advice: "Cuff the jeans.".to_string(),
                weather_rationale: "Light layers for a crisp day.".to_string(),
            })
        });
        let service = today_service(items, logs, weather_ok(), Some(stylist));

        let response = service.today_outfits(&request()).await.unwrap();

        let recommendation = response.ai_recommendation.unwrap();
        assert_eq!(recommendation.outfit_ids.len(), 2);
        assert_eq!(response.ai_error, None);
        assert_eq!(response.suggestions.len(), 1);
    }

    #[tokio::test]
    async fn test_stylist_failure_keeps_rule_based_result() {
        let (items, logs) = wardrobe();
        let mut stylist = MockStylistApi::new();
        stylist
            .expect_recommend()
            .returning(|_, _| Err(StylistError::MalformedResponse("missing outfit_ids".to_string())));
        let service = today_service(items, logs, weather_ok(), Some(stylist));

        let response = service.today_outfits(&request()).await.unwrap();

        assert_eq!(response.suggestions.len(), 1);
        assert_eq!(response.ai_recommendation, None);
        assert_eq!(
            response.ai_error.as_deref(),
            Some("Invalid response format from AI stylist: missing outfit_ids")
        );
    }

    #[tokio::test]
    async fn test_weather_failure_stops_everything() {
        let (items, logs) = wardrobe();
        let mut weather_api = MockWeatherApi::new();
        weather_api
            .expect_fetch_current()
            .returning(|_, _| Err(WeatherError::LocationNotFound));
        let mut stylist = MockStylistApi::new();
        stylist.expect_recommend().times(0);
        let service = today_service(items, logs, weather_api, Some(stylist));

        let err = service.today_outfits(&request()).await.unwrap_err();

        assert_eq!(err.downcast_ref::<WeatherError>(), Some(&WeatherError::LocationNotFound));
    }

    #[tokio::test]
    async fn test_empty_wardrobe() {
        let mut stylist = MockStylistApi::new();
        stylist
            .expect_recommend()
            .returning(|_, _| Err(StylistError::EmptyInventory));
        let service = today_service(
            vec![tagged(item("scarf", Category::Accessories, 20.0, 5), &["warm"])],
            vec![],
            weather_ok(),
            Some(stylist),
        );

        let response = service.today_outfits(&request()).await.unwrap();

        assert!(response.suggestions.is_empty());
        assert_eq!(
            response.ai_error.as_deref(),
            Some("No clothing items available to style")
        );
    }
}
