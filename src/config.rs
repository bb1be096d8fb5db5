//! Configuration management for the `TripCraft` application
//!
//! All settings come from environment variables (optionally loaded from a
//! `.env` file by the binary), with defaults suitable for local development.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::PlannerError;

/// Runtime configuration for the `TripCraft` application
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key; absence degrades generation per the fallback policy
    pub genai_api_key: Option<String>,
    /// Model identifier passed to the generateContent endpoint
    pub genai_model: String,
    /// Base URL of the generative language API
    pub genai_base_url: String,
    /// Base URL of the Wikipedia API
    pub wiki_base_url: String,
    /// HTTP listen port
    pub port: u16,
    /// Maximum concurrent image lookups
    pub image_workers: usize,
    /// Whether generation failures fall back to the built-in demo itinerary
    pub demo_fallback: bool,
    /// Optional file the last generation failure detail is written to
    pub error_log_path: Option<PathBuf>,
    /// Directory the form page and assets are served from
    pub static_dir: String,
    /// Timeout for outbound HTTP calls in seconds
    pub http_timeout_seconds: u64,
}

// Default value functions
fn default_genai_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_genai_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_wiki_base_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_image_workers() -> usize {
    5
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            genai_api_key: None,
            genai_model: default_genai_model(),
            genai_base_url: default_genai_base_url(),
            wiki_base_url: default_wiki_base_url(),
            port: default_port(),
            image_workers: default_image_workers(),
            demo_fallback: true,
            error_log_path: None,
            static_dir: default_static_dir(),
            http_timeout_seconds: default_http_timeout(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            genai_api_key: non_empty_var("GENAI_API_KEY"),
            genai_model: non_empty_var("GENAI_MODEL").unwrap_or_else(default_genai_model),
            genai_base_url: non_empty_var("GENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(default_genai_base_url),
            wiki_base_url: non_empty_var("WIKI_BASE_URL").unwrap_or_else(default_wiki_base_url),
            port: non_empty_var("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_port),
            image_workers: non_empty_var("TRIPCRAFT_IMAGE_WORKERS")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_image_workers),
            demo_fallback: non_empty_var("TRIPCRAFT_DEMO_FALLBACK")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            error_log_path: non_empty_var("TRIPCRAFT_ERROR_LOG").map(PathBuf::from),
            static_dir: non_empty_var("TRIPCRAFT_STATIC_DIR").unwrap_or_else(default_static_dir),
            http_timeout_seconds: non_empty_var("TRIPCRAFT_HTTP_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_http_timeout),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if let Some(api_key) = &self.genai_api_key {
            if api_key.len() < 8 {
                return Err(PlannerError::config(
                    "GENAI_API_KEY appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }
        }

        if self.image_workers == 0 || self.image_workers > 32 {
            return Err(
                PlannerError::config("TRIPCRAFT_IMAGE_WORKERS must be between 1 and 32").into(),
            );
        }

        if self.http_timeout_seconds == 0 || self.http_timeout_seconds > 300 {
            return Err(PlannerError::config(
                "TRIPCRAFT_HTTP_TIMEOUT_SECONDS must be between 1 and 300",
            )
            .into());
        }

        for (name, url) in [
            ("GENAI_BASE_URL", &self.genai_base_url),
            ("WIKI_BASE_URL", &self.wiki_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PlannerError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.genai_api_key.is_none());
        assert_eq!(config.genai_model, "gemini-2.5-flash");
        assert_eq!(
            config.genai_base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.wiki_base_url, "https://en.wikipedia.org/w/api.php");
        assert_eq!(config.port, 3000);
        assert_eq!(config.image_workers, 5);
        assert!(config.demo_fallback);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_short_api_key() {
        let mut config = AppConfig::default();
        config.genai_api_key = Some("short".to_string());
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_validation_worker_bounds() {
        let mut config = AppConfig::default();
        config.image_workers = 0;
        assert!(config.validate().is_err());

        config.image_workers = 33;
        assert!(config.validate().is_err());

        config.image_workers = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_base_url_scheme() {
        let mut config = AppConfig::default();
        config.wiki_base_url = "ftp://example.org/api.php".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("WIKI_BASE_URL"));
    }
}
