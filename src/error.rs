//! Error types and handling for the `TripCraft` application

use thiserror::Error;

/// Main error type for the `TripCraft` application
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Generative model communication errors
    #[error("Model error: {message}")]
    Model { message: String },

    /// Model output that did not match the itinerary contract
    #[error("Malformed model response: {message}")]
    MalformedResponse { message: String },

    /// Image lookup errors
    #[error("Image lookup error: {message}")]
    ImageLookup { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new model error
    pub fn model<S: Into<String>>(message: S) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new image lookup error
    pub fn image_lookup<S: Into<String>>(message: S) -> Self {
        Self::ImageLookup {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "The planner is not configured. Please set GENAI_API_KEY.".to_string()
            }
            PlannerError::Model { .. } => {
                "Failed to generate an itinerary. Please try again.".to_string()
            }
            PlannerError::MalformedResponse { .. } => {
                "The itinerary service returned an unexpected answer. Please try again."
                    .to_string()
            }
            PlannerError::ImageLookup { .. } => {
                "Unable to fetch images for the itinerary.".to_string()
            }
            PlannerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            PlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = PlannerError::config("missing API key");
        assert!(matches!(config_err, PlannerError::Config { .. }));

        let model_err = PlannerError::model("connection failed");
        assert!(matches!(model_err, PlannerError::Model { .. }));

        let validation_err = PlannerError::validation("days must be positive");
        assert!(matches!(validation_err, PlannerError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = PlannerError::config("test");
        assert!(config_err.user_message().contains("GENAI_API_KEY"));

        let model_err = PlannerError::model("test");
        assert!(model_err.user_message().contains("Failed to generate"));

        let validation_err = PlannerError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let planner_err: PlannerError = io_err.into();
        assert!(matches!(planner_err, PlannerError::Io { .. }));
    }
}
