//! Weather fitness scoring for individual items.
//!
//! A reading is reduced to three independent flags (cold, hot, rainy) and
//! each flag adds its own adjustments to a base score of 1.0. The result is
//! a relative ranking signal and is not clamped.

use shared::{Category, ClothingItem, WeatherReading};

/// Below this temperature (°F) the weather counts as cold
pub const COLD_BELOW_F: f64 = 60.0;
/// Above this temperature (°F) the weather counts as hot
pub const HOT_ABOVE_F: f64 = 75.0;

const BASE_SCORE: f64 = 1.0;
const COLD_WARM_BONUS: f64 = 0.5;
const COLD_OUTERWEAR_BONUS: f64 = 0.3;
const HOT_WARM_OUTERWEAR_PENALTY: f64 = 0.5;
const HOT_OUTERWEAR_PENALTY: f64 = 0.2;
const RAIN_BONUS: f64 = 0.4;

/// Coarse classification of a weather reading. Flags are not exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeatherConditions {
    pub is_cold: bool,
    pub is_hot: bool,
    pub is_rainy: bool,
}

impl WeatherConditions {
    pub fn classify(temp: f64, description: &str) -> Self {
        Self {
            is_cold: temp < COLD_BELOW_F,
            is_hot: temp > HOT_ABOVE_F,
            is_rainy: description.to_lowercase().contains("rain"),
        }
    }

    pub fn from_reading(reading: &WeatherReading) -> Self {
        Self::classify(reading.temp, &reading.description)
    }

    /// Headline for an outfit, first match wins: cold, hot, rainy.
    pub fn outfit_reason(&self) -> &'static str {
        if self.is_cold {
            "Perfect for the cold weather"
        } else if self.is_hot {
            "Great for warm weather"
        } else if self.is_rainy {
            "Rain-ready outfit"
        } else {
            "Weather-appropriate outfit"
        }
    }
}

/// Score how well one item suits the conditions
pub fn score_item_for_weather(item: &ClothingItem, conditions: &WeatherConditions) -> f64 {
    let is_outerwear = item.category == Category::Outerwear;
    let is_warm = item.has_tag("warm");
    let mut score = BASE_SCORE;

    if conditions.is_cold {
        if is_warm || is_outerwear {
            score += COLD_WARM_BONUS;
        }
        if is_outerwear {
            score += COLD_OUTERWEAR_BONUS;
        }
    }

    if conditions.is_hot {
        if is_warm && is_outerwear {
            score -= HOT_WARM_OUTERWEAR_PENALTY;
        }
        if is_outerwear {
            score -= HOT_OUTERWEAR_PENALTY;
        }
    }

    if conditions.is_rainy && (item.has_tag("waterproof") || is_outerwear) {
        score += RAIN_BONUS;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::test_support::{item, tagged};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_classification_thresholds() {
        assert!(WeatherConditions::classify(59.9, "clear").is_cold);
        assert!(!WeatherConditions::classify(60.0, "clear").is_cold);
        assert!(!WeatherConditions::classify(75.0, "clear").is_hot);
        assert!(WeatherConditions::classify(75.1, "clear").is_hot);
        assert!(WeatherConditions::classify(65.0, "Light RAIN").is_rainy);
        assert!(WeatherConditions::classify(65.0, "thunderstorm with rain").is_rainy);
        assert!(!WeatherConditions::classify(65.0, "drizzle").is_rainy);

        let both = WeatherConditions::classify(40.0, "moderate rain");
        assert!(both.is_cold && both.is_rainy && !both.is_hot);
    }

    #[test]
    fn test_warm_outerwear_cold_and_hot() {
        let parka = tagged(item("parka", Category::Outerwear, 200.0, 10), &["warm"]);

        let cold = WeatherConditions::classify(40.0, "clear sky");
        assert!(close(score_item_for_weather(&parka, &cold), 1.8));

        let hot = WeatherConditions::classify(85.0, "clear sky");
        assert!(close(score_item_for_weather(&parka, &hot), 0.3));
    }

    #[test]
    fn test_independent_bonuses() {
        let cold = WeatherConditions::classify(50.0, "clear");
        let sweater = tagged(item("sweater", Category::Tops, 50.0, 10), &["warm"]);
        let windbreaker = item("windbreaker", Category::Outerwear, 70.0, 10);
        let tee = item("tee", Category::Tops, 10.0, 10);

        assert!(close(score_item_for_weather(&sweater, &cold), 1.5));
        assert!(close(score_item_for_weather(&windbreaker, &cold), 1.8));
        assert!(close(score_item_for_weather(&tee, &cold), 1.0));

        let hot = WeatherConditions::classify(90.0, "sunny");
        assert!(close(score_item_for_weather(&windbreaker, &hot), 0.8));
        assert!(close(score_item_for_weather(&sweater, &hot), 1.0));
    }

    #[test]
    fn test_rain_bonus_stacks_with_cold() {
        let cold_rain = WeatherConditions::classify(45.0, "light rain");
        let boots = tagged(item("boots", Category::Shoes, 90.0, 10), &["waterproof"]);
        let raincoat = item("raincoat", Category::Outerwear, 90.0, 10);

        assert!(close(score_item_for_weather(&boots, &cold_rain), 1.4));
        assert!(close(score_item_for_weather(&raincoat, &cold_rain), 2.2));
    }

    #[test]
    fn test_tag_match_is_exact() {
        let cold = WeatherConditions::classify(30.0, "snow");
        let shirt = tagged(item("shirt", Category::Tops, 10.0, 10), &["Warm"]);
        assert!(close(score_item_for_weather(&shirt, &cold), 1.0));
    }

    #[test]
    fn test_reason_precedence() {
        assert_eq!(
            WeatherConditions::classify(40.0, "rain").outfit_reason(),
            "Perfect for the cold weather"
        );
        assert_eq!(WeatherConditions::classify(90.0, "rain").outfit_reason(), "Great for warm weather");
        assert_eq!(WeatherConditions::classify(65.0, "rain").outfit_reason(), "Rain-ready outfit");
        assert_eq!(
            WeatherConditions::classify(65.0, "overcast").outfit_reason(),
            "Weather-appropriate outfit"
        );
    }
}
