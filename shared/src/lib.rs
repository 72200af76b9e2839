use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Clothing category. The set is closed: every item belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Bottoms,
    Outerwear,
    Shoes,
    Accessories,
}

impl Category {
    /// All categories in catalog display order
    pub const ALL: [Category; 5] = [
        Category::Tops,
        Category::Bottoms,
        Category::Outerwear,
        Category::Shoes,
        Category::Accessories,
    ];

    /// Wire/storage value, e.g. "tops"
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Outerwear => "outerwear",
            Category::Shoes => "shoes",
            Category::Accessories => "accessories",
        }
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            Category::Tops => "Tops",
            Category::Bottoms => "Bottoms",
            Category::Outerwear => "Outerwear",
            Category::Shoes => "Shoes",
            Category::Accessories => "Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tops" => Ok(Category::Tops),
            "bottoms" => Ok(Category::Bottoms),
            "outerwear" => Ok(Category::Outerwear),
            "shoes" => Ok(Category::Shoes),
            "accessories" => Ok(Category::Accessories),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryParseError(pub String);

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown clothing category: {}", self.0)
    }
}

impl std::error::Error for CategoryParseError {}

/// A cataloged piece of clothing.
///
/// Dates are kept as ISO-8601 strings exactly as they were entered; all
/// interpretation happens in the backend's date math, which never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub brand: Option<String>,
    pub size: Option<String>,
    /// Color labels, order irrelevant
    pub colors: Vec<String>,
    pub material: Option<String>,
    /// Purchase price, never negative
    pub purchase_price: f64,
    /// ISO-8601 calendar date or timestamp
    pub purchase_date: String,
    /// Opaque photo handle
    pub photo_uri: String,
    pub care_instructions: Option<String>,
    /// Free-text tags such as "warm", "waterproof", "casual"
    pub tags: Vec<String>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

impl ClothingItem {
    /// Generate a fresh item ID in format "item::<uuid>"
    pub fn generate_id() -> String {
        format!("item::{}", Uuid::new_v4().simple())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A single wear event for an item. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearLog {
    pub id: String,
    pub item_id: String,
    /// ISO-8601 timestamp of the wear
    pub wear_date: String,
}

impl WearLog {
    /// Generate a wear log ID in format "<item_id>-<uuid>"
    pub fn generate_id(item_id: &str) -> String {
        format!("{}-{}", item_id, Uuid::new_v4().simple())
    }
}

/// Metrics derived from an item and its wear logs. Recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAnalytics {
    pub item_id: String,
    pub times_worn: usize,
    /// Purchase price divided by times worn, or the full price if never worn
    pub cost_per_wear: f64,
    /// Whole days since the latest wear. `-1` means never worn.
    pub days_since_last_wear: i64,
    pub days_owned: i64,
    /// Times worn per day owned, 0 when owned for less than a day
    pub wear_frequency: f64,
}

impl ItemAnalytics {
    /// Sentinel value of `days_since_last_wear` for items never worn
    pub const NEVER_WORN: i64 = -1;

    /// Days since last wear, or `None` when the item has never been worn
    pub fn last_worn_days(&self) -> Option<i64> {
        if self.days_since_last_wear == Self::NEVER_WORN {
            None
        } else {
            Some(self.days_since_last_wear)
        }
    }
}

/// Current conditions as reported by the weather service (imperial units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Degrees Fahrenheit
    pub temp: f64,
    /// Degrees Fahrenheit
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
    /// Percent
    pub humidity: f64,
    /// Miles per hour
    pub wind_speed: f64,
}

/// A composed outfit produced by the rule-based engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitSuggestion {
    pub items: Vec<ClothingItem>,
    pub score: f64,
    pub reason: String,
    pub avg_cost_per_wear: f64,
}

/// Compact view of an item handed to the AI stylist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosetItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub wear_count: usize,
    /// Latest wear date, or the item's creation date if never worn
    pub last_worn: String,
    pub tags: Vec<String>,
}

/// Structured recommendation returned by the AI stylist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitRecommendation {
    pub outfit_ids: Vec<String>,
    pub styling_advice: String,
    pub weather_rationale: String,
}

/// Wardrobe-wide usage summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeInsights {
    pub total_items: usize,
    pub total_wears: usize,
    pub total_spent: f64,
    /// Total spent divided by total wears, or total spent if nothing was worn
    pub avg_cost_per_wear: f64,
    /// Up to five items, most worn first
    pub most_worn: Vec<ClothingItem>,
    pub stagnant_items: Vec<ClothingItem>,
    pub item_analytics: Vec<ItemAnalytics>,
}

/// Request to catalog a new item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub category: Category,
    pub brand: Option<String>,
    pub size: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    pub material: Option<String>,
    #[serde(default)]
    pub purchase_price: f64,
    pub purchase_date: String,
    pub photo_uri: String,
    pub care_instructions: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request to edit an existing item. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub colors: Option<Vec<String>>,
    pub material: Option<String>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<String>,
    pub photo_uri: Option<String>,
    pub care_instructions: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Closet listing filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemListRequest {
    pub category: Option<Category>,
    /// Case-insensitive match against name, brand and tags
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemListResponse {
    pub items: Vec<ClothingItem>,
}

/// Request to log a wear. Uses the current time if no date is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogWearRequest {
    pub wear_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogWearResponse {
    pub wear_log: WearLog,
    pub analytics: ItemAnalytics,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteItemResponse {
    pub item_id: String,
    pub deleted_wear_logs: usize,
    pub success_message: String,
}

/// Coordinates for the daily outfit lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayOutfitsRequest {
    pub lat: f64,
    pub lon: f64,
}

/// Weather plus both outfit recommendation paths, side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayOutfitsResponse {
    pub weather: WeatherReading,
    pub suggestions: Vec<OutfitSuggestion>,
    /// Present only when the AI stylist is configured and succeeded
    pub ai_recommendation: Option<OutfitRecommendation>,
    /// Why the AI stylist produced nothing, when it was attempted
    pub ai_error: Option<String>,
}
