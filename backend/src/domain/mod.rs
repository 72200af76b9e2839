//! # Domain Layer
//!
//! Business logic for the wardrobe: usage analytics, stagnation detection,
//! weather-aware outfit composition and the services that tie them to
//! storage and the external providers.
//!
//! ## Key Responsibilities
//!
//! - **Analytics**: Cost per wear, recency and frequency of every item
//! - **Outfit Composition**: Ranking items for the weather and pairing them
//! - **Catalog Management**: Validated item CRUD and wear logging
//! - **Today's Outfit**: Combining weather, rule-based and AI suggestions
//!
//! The analytic core (`date_math`, `analytics`, `stagnation`,
//! `weather_scoring`, `outfit_composer`) is synchronous and takes "now" as a
//! parameter. The services are async and read the time from a [`Clock`].

pub mod analytics;
pub mod clock;
pub mod date_math;
pub mod outfit_advisor;
pub mod outfit_composer;
pub mod stagnation;
pub mod today_service;
pub mod wardrobe_service;
pub mod weather_scoring;

pub use clock::{Clock, FixedClock, SystemClock};
pub use outfit_advisor::{OutfitAdvisor, RuleBasedAdvisor, StylistAdvisor};
pub use stagnation::StagnationDetector;
pub use today_service::TodayService;
pub use wardrobe_service::{ItemNotFound, ItemValidationError, WardrobeService};
