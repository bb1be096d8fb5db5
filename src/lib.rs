//! `TripCraft` - AI-assisted trip planning web service
//!
//! This library provides the core functionality for itinerary generation
//! via a generative text model and best-effort image enrichment of the
//! resulting plan.

pub mod api;
pub mod config;
pub mod error;
pub mod genai;
pub mod generator;
pub mod images;
pub mod models;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::AppConfig;
pub use error::PlannerError;
pub use genai::{GeminiClient, TextModel};
pub use generator::{ItineraryGenerator, ItinerarySource};
pub use images::{Category, Enricher, ImageSource, WikiImageClient};
pub use models::{Itinerary, TripRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
