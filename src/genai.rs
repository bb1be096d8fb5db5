//! Generative model client.
//!
//! `TextModel` is the seam the generator and the chat/status handlers talk
//! to; `GeminiClient` is the production implementation against the Google
//! generative language REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::PlannerError;
use crate::Result;

/// Sampling temperature used for itinerary generation
const TEMPERATURE: f32 = 0.7;

/// Text-generation backend
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a response constrained to machine-parseable JSON
    async fn generate_json(&self, prompt: &str) -> Result<String>;

    /// Generate a short free-text response
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}

/// Gemini REST API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

/// generateContent response envelope
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client when a credential is configured
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.genai_api_key.clone()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .user_agent(concat!("TripCraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Some(Self {
            client,
            api_key,
            base_url: config.genai_base_url.clone(),
            model: config.genai_model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!("{}/{}:generateContent", self.base_url, model_path)
    }

    async fn generate(&self, prompt: &str, json_output: bool) -> Result<String> {
        let mut generation_config = json!({ "temperature": TEMPERATURE });
        if json_output {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });

        debug!("Calling generateContent on {}", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PlannerError::model(format!("Model request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return match status.as_u16() {
                401 | 403 => Err(PlannerError::model(format!(
                    "Model credential rejected ({status}): {error_text}"
                ))),
                429 => Err(PlannerError::model(format!(
                    "Model quota exceeded: {error_text}"
                ))),
                _ => Err(PlannerError::model(format!(
                    "Model API error {status}: {error_text}"
                ))),
            };
        }

        let envelope: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::model(format!("Failed to parse model envelope: {e}")))?;

        let text = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty());

        text.ok_or_else(|| PlannerError::model("Model returned an empty response"))
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate_json(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, true).await
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(model: &str) -> GeminiClient {
        let config = AppConfig {
            genai_api_key: Some("test-api-key-123".to_string()),
            genai_model: model.to_string(),
            ..AppConfig::default()
        };
        GeminiClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = AppConfig::default();
        assert!(GeminiClient::from_config(&config).is_none());
    }

    #[test]
    fn test_endpoint_model_path() {
        let client = client_with("gemini-2.5-flash");
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );

        let client = client_with("models/gemini-2.5-flash");
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_envelope_text_extraction() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"hotels\":[]}"}]}}
            ]
        }"#;
        let envelope: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text = envelope.candidates[0]
            .content
            .as_ref()
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref());
        assert_eq!(text, Some("{\"hotels\":[]}"));
    }
}
