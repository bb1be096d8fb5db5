use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tripcraft::api::AppState;
use tripcraft::config::AppConfig;
use tripcraft::genai::{GeminiClient, TextModel};
use tripcraft::generator::ItineraryGenerator;
use tripcraft::images::{Enricher, WikiImageClient};
use tripcraft::web;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let model: Option<Arc<dyn TextModel>> = match GeminiClient::from_config(&config) {
        Some(client) => {
            tracing::info!("Gemini client initialized ({})", config.genai_model);
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("GENAI_API_KEY not found, itinerary generation degrades to demo mode");
            None
        }
    };

    let generator =
        ItineraryGenerator::new(model, config.demo_fallback, config.error_log_path.clone());
    let enricher = Enricher::new(Arc::new(WikiImageClient::new(&config)), config.image_workers);

    let state = Arc::new(AppState {
        generator,
        enricher,
    });

    web::run(state, &config).await;
    Ok(())
}
