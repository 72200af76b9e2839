//! Two ways of answering "what should I wear today?" behind one interface.
//!
//! [`RuleBasedAdvisor`] runs the deterministic outfit composer and never
//! fails. [`StylistAdvisor`] hands the catalog to an external AI stylist and
//! can fail for any of the stylist's reasons. Callers decide how to combine
//! the two.

use anyhow::Result;
use async_trait::async_trait;
use shared::{ClothingItem, OutfitRecommendation, OutfitSuggestion, WeatherReading};
use std::sync::Arc;

use crate::domain::analytics::WearLogsByItem;
use crate::domain::clock::Clock;
use crate::domain::outfit_composer::suggest_outfits;
use crate::providers::stylist::{convert_to_closet_items, StylistApi};

#[async_trait]
pub trait OutfitAdvisor: Send + Sync {
    type Advice: Send;

    async fn advise(
        &self,
        items: &[ClothingItem],
        weather: &WeatherReading,
        wear_logs_by_item: &WearLogsByItem,
    ) -> Result<Self::Advice>;
}

/// Ranked outfits from the scoring rules
#[derive(Clone)]
pub struct RuleBasedAdvisor {
    clock: Arc<dyn Clock>,
}

impl RuleBasedAdvisor {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl OutfitAdvisor for RuleBasedAdvisor {
    type Advice = Vec<OutfitSuggestion>;

    async fn advise(
        &self,
        items: &[ClothingItem],
        weather: &WeatherReading,
        wear_logs_by_item: &WearLogsByItem,
    ) -> Result<Self::Advice> {
        Ok(suggest_outfits(items, weather, wear_logs_by_item, self.clock.now()))
    }
}

/// A single styled outfit from the AI stylist
#[derive(Clone)]
pub struct StylistAdvisor {
    stylist: Arc<dyn StylistApi>,
}

impl StylistAdvisor {
    pub fn new(stylist: Arc<dyn StylistApi>) -> Self {
        Self { stylist }
    }
}

#[async_trait]
impl OutfitAdvisor for StylistAdvisor {
    type Advice = OutfitRecommendation;

    async fn advise(
        &self,
        items: &[ClothingItem],
        weather: &WeatherReading,
        wear_logs_by_item: &WearLogsByItem,
    ) -> Result<Self::Advice> {
        let inventory = convert_to_closet_items(items, wear_logs_by_item);
        let recommendation = self.stylist.recommend(&inventory, weather).await?;
        Ok(recommendation)
    }
}
