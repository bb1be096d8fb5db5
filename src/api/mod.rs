//! HTTP API: request DTOs, handlers and the router.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::Form;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::generator::{ItineraryGenerator, ItinerarySource};
use crate::images::Enricher;
use crate::models::{Itinerary, TripRequest};

/// Line returned by the chat endpoint when the model is unavailable
const CHAT_FALLBACK: &str =
    "Sorry, the travel assistant is unavailable right now. Please try again later.";

/// Longest trip the planner will generate; also caps the enrichment fan-out
const MAX_DAYS: u32 = 30;

/// Shared per-process services; read-only from the handlers' perspective
pub struct AppState {
    pub generator: ItineraryGenerator,
    pub enricher: Enricher,
}

#[derive(Debug, Deserialize)]
struct PlanForm {
    #[serde(default)]
    destination: String,
    #[serde(default)]
    days: Option<String>,
    #[serde(default)]
    budget: Option<String>,
    #[serde(default)]
    interests: Vec<String>,
    #[serde(default)]
    travelers_type: Option<String>,
    #[serde(default)]
    travelers_count: Option<String>,
}

#[derive(Debug, Serialize)]
struct PlanResponse {
    destination: String,
    travelers: String,
    source: ItinerarySource,
    plan: Itinerary,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    context: ChatContext,
}

#[derive(Debug, Default, Deserialize)]
struct ChatContext {
    destination: Option<String>,
    // The widget sends days as either a number or a string.
    days: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/plan", get(plan_form).post(plan))
        .route("/status", get(status))
        .route("/chat", post(chat))
        .with_state(state)
}

async fn plan_form() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

async fn plan(State(state): State<Arc<AppState>>, Form(form): Form<PlanForm>) -> Response {
    let request = match validate_form(form) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: e.user_message(),
                }),
            )
                .into_response();
        }
    };

    match state.generator.generate(&request).await {
        Ok((mut itinerary, source)) => {
            state
                .enricher
                .enrich(&mut itinerary, &request.destination)
                .await;

            (
                StatusCode::OK,
                Json(PlanResponse {
                    destination: request.destination,
                    travelers: request.travelers,
                    source,
                    plan: itinerary,
                }),
            )
                .into_response()
        }
        Err(e) => {
            let mut error = e.user_message();
            if let Some(detail) = state.generator.last_failure().await {
                error = format!("{error} Last recorded failure: {detail}");
            }
            (StatusCode::BAD_GATEWAY, Json(ErrorBody { error })).into_response()
        }
    }
}

/// Reachability probe: one trivial round trip to the model
async fn status(State(state): State<Arc<AppState>>) -> Json<StatusBody> {
    let Some(model) = state.generator.model() else {
        return Json(StatusBody {
            status: "error",
            message: "GENAI_API_KEY is not configured".to_string(),
        });
    };

    match model.generate_text("Reply with the single word OK.").await {
        Ok(_) => Json(StatusBody {
            status: "connected",
            message: "Model backend is reachable".to_string(),
        }),
        Err(e) => Json(StatusBody {
            status: "error",
            message: e.user_message(),
        }),
    }
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let message = request.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "Field \"message\" must be a non-empty string".to_string(),
            }),
        )
            .into_response();
    }

    let Some(model) = state.generator.model() else {
        return Json(ChatResponse {
            response: CHAT_FALLBACK.to_string(),
        })
        .into_response();
    };

    let prompt = chat_prompt(message, &request.context);
    let response = match model.generate_text(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Chat generation failed: {e}");
            CHAT_FALLBACK.to_string()
        }
    };

    Json(ChatResponse { response }).into_response()
}

fn chat_prompt(message: &str, context: &ChatContext) -> String {
    let destination = context.destination.as_deref().unwrap_or("an upcoming trip");
    let days = context
        .days
        .as_ref()
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "a few".to_string());

    format!(
        "You are a concise travel assistant helping with a {days}-day trip to \
         {destination}. Answer the traveler's question in two or three sentences.\n\n\
         Question: {message}"
    )
}

fn validate_form(form: PlanForm) -> crate::Result<TripRequest> {
    let destination = form.destination.trim().to_string();
    if destination.is_empty() {
        return Err(PlannerError::validation("destination is required"));
    }

    let days: u32 = form
        .days
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| PlannerError::validation("days is required"))?
        .parse()
        .map_err(|_| PlannerError::validation("days must be a positive number"))?;
    if days == 0 || days > MAX_DAYS {
        return Err(PlannerError::validation(format!(
            "days must be between 1 and {MAX_DAYS}"
        )));
    }

    let travelers_count = form
        .travelers_count
        .as_deref()
        .and_then(|c| c.trim().parse().ok())
        .unwrap_or(1);

    Ok(TripRequest::new(
        destination,
        days,
        form.budget
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "Mid-range".to_string()),
        form.interests,
        form.travelers_type.as_deref().unwrap_or("Solo"),
        travelers_count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_form() -> PlanForm {
        PlanForm {
            destination: "Paris".to_string(),
            days: Some("3".to_string()),
            budget: Some("Mid-range".to_string()),
            interests: vec!["Food".to_string()],
            travelers_type: Some("Couple".to_string()),
            travelers_count: Some("2".to_string()),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let request = validate_form(base_form()).unwrap();
        assert_eq!(request.destination, "Paris");
        assert_eq!(request.days, 3);
        assert_eq!(request.budget, "Mid-range");
        assert_eq!(request.travelers, "Couple");
    }

    #[test]
    fn test_validate_rejects_missing_destination() {
        let mut form = base_form();
        form.destination = "   ".to_string();
        let err = validate_form(form).unwrap_err();
        assert!(matches!(err, PlannerError::Validation { .. }));
        assert!(err.user_message().contains("destination"));
    }

    #[test]
    fn test_validate_rejects_bad_days() {
        let mut form = base_form();
        form.days = None;
        assert!(validate_form(form).is_err());

        let mut form = base_form();
        form.days = Some("0".to_string());
        assert!(validate_form(form).is_err());

        let mut form = base_form();
        form.days = Some("soon".to_string());
        assert!(validate_form(form).is_err());
    }

    #[test]
    fn test_validate_caps_trip_length() {
        // A huge day count must be rejected up front, before the generator
        // would materialize one Day per requested day.
        let mut form = base_form();
        form.days = Some("2000000000".to_string());
        let err = validate_form(form).unwrap_err();
        assert!(matches!(err, PlannerError::Validation { .. }));
        assert!(err.user_message().contains("between 1 and 30"));

        let mut form = base_form();
        form.days = Some("31".to_string());
        assert!(validate_form(form).is_err());

        let mut form = base_form();
        form.days = Some("30".to_string());
        assert_eq!(validate_form(form).unwrap().days, 30);
    }

    #[test]
    fn test_validate_applies_defaults() {
        let mut form = base_form();
        form.budget = None;
        form.travelers_type = None;
        form.travelers_count = None;
        form.interests = vec![];

        let request = validate_form(form).unwrap();
        assert_eq!(request.budget, "Mid-range");
        assert_eq!(request.travelers, "Solo Traveler");
        assert_eq!(request.interests_label(), "General");
    }

    #[test]
    fn test_chat_prompt_includes_context() {
        let context = ChatContext {
            destination: Some("Kyoto".to_string()),
            days: Some(serde_json::json!(4)),
        };
        let prompt = chat_prompt("Where should I eat?", &context);
        assert!(prompt.contains("4-day trip to Kyoto"));
        assert!(prompt.contains("Where should I eat?"));

        let prompt = chat_prompt("hello", &ChatContext::default());
        assert!(prompt.contains("an upcoming trip"));
    }

    #[test]
    fn test_plan_response_source_serialization() {
        let body = PlanResponse {
            destination: "Paris".to_string(),
            travelers: "Couple".to_string(),
            source: ItinerarySource::Demo,
            plan: Itinerary::default(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["source"], "demo");
    }
}
