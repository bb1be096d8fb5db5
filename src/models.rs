//! Core data types: the trip request and the generated itinerary tree.
//!
//! The itinerary structs double as the wire contract for the model output.
//! Every field except `name` is optional and collections default to empty,
//! so a partially conforming model response still parses; ratings and day
//! numbers are coerced from either JSON numbers or numeric strings.

use serde::{Deserialize, Deserializer, Serialize};

/// One trip-planning request, built once per HTTP request
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub destination: String,
    pub days: u32,
    pub budget: String,
    pub interests: Vec<String>,
    /// Derived descriptive string, e.g. "Couple" or "Family group of 4"
    pub travelers: String,
}

impl TripRequest {
    pub fn new(
        destination: impl Into<String>,
        days: u32,
        budget: impl Into<String>,
        interests: Vec<String>,
        travelers_type: &str,
        travelers_count: u32,
    ) -> Self {
        Self {
            destination: destination.into(),
            days,
            budget: budget.into(),
            interests,
            travelers: travelers_label(travelers_type, travelers_count),
        }
    }

    /// Interests joined for the prompt, "General" when none were selected
    #[must_use]
    pub fn interests_label(&self) -> String {
        if self.interests.is_empty() {
            "General".to_string()
        } else {
            self.interests.join(", ")
        }
    }
}

/// Derive the traveler description from the form's type/count pair
#[must_use]
pub fn travelers_label(travelers_type: &str, travelers_count: u32) -> String {
    match travelers_type {
        "Solo" => "Solo Traveler".to_string(),
        "Couple" => "Couple".to_string(),
        other => format!("{other} group of {travelers_count}"),
    }
}

/// Generated trip plan tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub itinerary: Vec<Day>,
    #[serde(default)]
    pub food: Vec<FoodSpot>,
}

impl Itinerary {
    /// True when all three top-level collections carry at least one entry
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.hotels.is_empty() && !self.itinerary.is_empty() && !self.food.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hotel {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de_rating")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Day {
    #[serde(default, deserialize_with = "de_day_number")]
    pub day: u32,
    #[serde(default)]
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de_rating")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodSpot {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de_rating")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Accept ratings as JSON numbers or numeric strings; anything else is None
fn de_rating<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n as f32),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept day numbers as JSON numbers or numeric strings; anything else is 0
fn de_day_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travelers_label_variants() {
        assert_eq!(travelers_label("Solo", 1), "Solo Traveler");
        assert_eq!(travelers_label("Couple", 2), "Couple");
        assert_eq!(travelers_label("Family", 4), "Family group of 4");
        assert_eq!(travelers_label("Friends", 6), "Friends group of 6");
    }

    #[test]
    fn test_interests_label() {
        let mut req = TripRequest::new("Paris", 3, "Mid-range", vec![], "Solo", 1);
        assert_eq!(req.interests_label(), "General");

        req.interests = vec!["Food".to_string(), "History".to_string()];
        assert_eq!(req.interests_label(), "Food, History");
    }

    #[test]
    fn test_parse_minimal_itinerary() {
        let json = r#"{"hotels":[{"name":"Grand Hotel"}]}"#;
        let parsed: Itinerary = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.hotels.len(), 1);
        assert_eq!(parsed.hotels[0].name, "Grand Hotel");
        assert!(parsed.hotels[0].rating.is_none());
        assert!(parsed.itinerary.is_empty());
        assert!(parsed.food.is_empty());
        assert!(!parsed.is_populated());
    }

    #[test]
    fn test_rating_coercion() {
        let json = r#"{
            "hotels": [
                {"name": "A", "rating": 4.5},
                {"name": "B", "rating": "3.8"},
                {"name": "C", "rating": true}
            ]
        }"#;
        let parsed: Itinerary = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.hotels[0].rating, Some(4.5));
        assert_eq!(parsed.hotels[1].rating, Some(3.8));
        assert_eq!(parsed.hotels[2].rating, None);
    }

    #[test]
    fn test_day_number_coercion() {
        let json = r#"{"itinerary":[{"day":"2","places":[{"name":"Louvre","time":"Morning"}]}]}"#;
        let parsed: Itinerary = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.itinerary[0].day, 2);
        assert_eq!(parsed.itinerary[0].places[0].time.as_deref(), Some("Morning"));
    }

    #[test]
    fn test_food_type_wire_name() {
        let json = r#"{"food":[{"name":"Chez Marie","type":"Bistro","location":"Montmartre"}]}"#;
        let parsed: Itinerary = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.food[0].kind.as_deref(), Some("Bistro"));

        let out = serde_json::to_value(&parsed).unwrap();
        assert_eq!(out["food"][0]["type"], "Bistro");
    }
}
