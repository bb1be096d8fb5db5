//! Itinerary generation: prompt construction, defensive parsing of the
//! model output, and the demo fallback policy.
//!
//! Failure policy: with `demo_fallback` enabled (the default), any failure
//! of the model path — missing credential, transport error, empty or
//! malformed output — is logged, recorded to the failure-log artifact, and
//! answered with the built-in demo itinerary. With the flag disabled the
//! typed error is returned to the handler instead. Exactly one model call
//! is made per request either way.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::PlannerError;
use crate::genai::TextModel;
use crate::models::{Day, FoodSpot, Hotel, Itinerary, Place, TripRequest};
use crate::Result;

/// Where a returned itinerary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItinerarySource {
    Model,
    Demo,
}

/// Itinerary generation service
pub struct ItineraryGenerator {
    model: Option<Arc<dyn TextModel>>,
    demo_fallback: bool,
    error_log_path: Option<PathBuf>,
}

impl ItineraryGenerator {
    pub fn new(
        model: Option<Arc<dyn TextModel>>,
        demo_fallback: bool,
        error_log_path: Option<PathBuf>,
    ) -> Self {
        Self {
            model,
            demo_fallback,
            error_log_path,
        }
    }

    /// Whether a generative model backend is configured
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&Arc<dyn TextModel>> {
        self.model.as_ref()
    }

    /// Generate an itinerary for the request, applying the fallback policy
    pub async fn generate(&self, request: &TripRequest) -> Result<(Itinerary, ItinerarySource)> {
        match self.try_model(request).await {
            Ok(itinerary) => {
                info!(
                    destination = %request.destination,
                    days = request.days,
                    hotels = itinerary.hotels.len(),
                    "Generated itinerary from model"
                );
                Ok((itinerary, ItinerarySource::Model))
            }
            Err(e) => {
                warn!("Itinerary generation failed: {e}");
                self.record_failure(&e).await;

                if self.demo_fallback {
                    info!(
                        destination = %request.destination,
                        "Falling back to demo itinerary"
                    );
                    Ok((demo_itinerary(request), ItinerarySource::Demo))
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn try_model(&self, request: &TripRequest) -> Result<Itinerary> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| PlannerError::config("GENAI_API_KEY is not configured"))?;

        let prompt = build_prompt(request);
        debug!("Prompting model for {}", request.destination);

        let text = model.generate_json(&prompt).await?;
        parse_model_output(&text)
    }

    /// Persist the last failure detail so it can be surfaced to the next
    /// failed response
    async fn record_failure(&self, error: &PlannerError) {
        if let Some(path) = &self.error_log_path {
            if let Err(write_err) = tokio::fs::write(path, error.to_string()).await {
                debug!("Could not record failure to {}: {write_err}", path.display());
            }
        }
    }

    /// Most recently recorded failure detail, if any
    pub async fn last_failure(&self) -> Option<String> {
        let path = self.error_log_path.as_ref()?;
        let detail = tokio::fs::read_to_string(path).await.ok()?;
        let detail = detail.trim();
        if detail.is_empty() {
            None
        } else {
            Some(detail.to_string())
        }
    }
}

/// Build the single generation prompt for a trip request
fn build_prompt(request: &TripRequest) -> String {
    format!(
        r#"Act as an expert AI travel planner.

Create a {days}-day trip itinerary for {destination} for {travelers} with a {budget} budget.
Interests: {interests}.

Requirements:
- Confirm that {destination} is a real destination and interpret it sensibly.
- The "itinerary" array must contain exactly {days} entries, with "day" numbered from 1 to {days}.
- Give every hotel, place and food entry a numeric "rating" between 1.0 and 5.0.
- Give every itinerary place a "time" label such as "Morning" or "2:00 PM".
- Include at least 4 hotels and at least 4 food recommendations.

Return STRICT JSON only, no prose, with exactly this shape:
{{"hotels": [{{"name": "...", "address": "...", "rating": 4.5, "price_range": "...", "description": "..."}}],
 "itinerary": [{{"day": 1, "places": [{{"name": "...", "description": "...", "address": "...", "rating": 4.5, "time": "Morning"}}]}}],
 "food": [{{"name": "...", "type": "...", "rating": 4.5, "location": "..."}}]}}"#,
        days = request.days,
        destination = request.destination,
        travelers = request.travelers,
        budget = request.budget,
        interests = request.interests_label(),
    )
}

/// Parse model output into the itinerary contract, tolerating Markdown
/// code fences around the JSON body
fn parse_model_output(text: &str) -> Result<Itinerary> {
    let body = strip_code_fences(text);

    let itinerary: Itinerary = serde_json::from_str(body)
        .map_err(|e| PlannerError::malformed(format!("Itinerary did not parse: {e}")))?;

    // Partial trees render fine; a tree with nothing in it does not.
    if itinerary.hotels.is_empty() && itinerary.itinerary.is_empty() && itinerary.food.is_empty() {
        return Err(PlannerError::malformed(
            "Model response contained no hotels, days or food",
        ));
    }

    Ok(itinerary)
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim().trim_end_matches("```").trim()
}

/// Fixed premium-style demo itinerary with the requested day count
#[must_use]
pub fn demo_itinerary(request: &TripRequest) -> Itinerary {
    let destination = &request.destination;

    let hotels = [
        ("The Grand Meridian", "Historic center", 4.8, "$$$$", "Flagship five-star stay with rooftop views"),
        ("Harborview Boutique Hotel", "Waterfront promenade", 4.6, "$$$", "Stylish rooms a short walk from the sights"),
        ("The Botanist House", "Garden district", 4.5, "$$$", "Quiet townhouse hotel with a leafy courtyard"),
        ("Stazione Palace", "Near the main station", 4.3, "$$", "Comfortable base with easy transit connections"),
    ];

    let places = [
        ("Old Town Walking Tour", "Guided loop through the historic quarter", "Morning"),
        ("City Museum of Art", "Collection spanning classical to contemporary", "Afternoon"),
        ("Sunset Viewpoint", "Panoramic overlook popular at golden hour", "Evening"),
        ("Central Market Hall", "Stalls, tastings and local produce", "Morning"),
        ("Riverside Promenade", "Flat scenic walk along the water", "Afternoon"),
        ("Observatory Hill", "Short climb rewarded with skyline views", "Evening"),
    ];

    let food = [
        ("Maison Lumière", "Fine dining", 4.7, "Historic center"),
        ("The Copper Pot", "Traditional", 4.5, "Old town"),
        ("Café Verde", "Café & brunch", 4.4, "Garden district"),
        ("Night Market Stalls", "Street food", 4.3, "Market square"),
    ];

    let days = (1..=request.days.max(1))
        .map(|day| {
            let offset = ((day - 1) as usize * 3) % places.len();
            let places = (0..3)
                .map(|i| {
                    let (name, description, time) = places[(offset + i) % places.len()];
                    Place {
                        name: name.to_string(),
                        description: Some(description.to_string()),
                        address: Some(destination.clone()),
                        rating: Some(4.4),
                        time: Some(time.to_string()),
                        image: None,
                    }
                })
                .collect();
            Day { day, places }
        })
        .collect();

    Itinerary {
        hotels: hotels
            .into_iter()
            .map(|(name, address, rating, price_range, description)| Hotel {
                name: name.to_string(),
                address: Some(format!("{address}, {destination}")),
                rating: Some(rating),
                price_range: Some(price_range.to_string()),
                description: Some(description.to_string()),
                image: None,
            })
            .collect(),
        itinerary: days,
        food: food
            .into_iter()
            .map(|(name, kind, rating, location)| FoodSpot {
                name: name.to_string(),
                kind: Some(kind.to_string()),
                rating: Some(rating),
                location: Some(format!("{location}, {destination}")),
                image: None,
            })
            .collect(),
    }
}
