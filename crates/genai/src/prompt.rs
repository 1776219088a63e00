//! Prompt construction.
//!
//! The prompt is a pure function of its inputs: the same request and names
//! always render the same text.

use mapa_core::trip_request::TripRequest;

/// Display names resolved from reference data before prompting.
///
/// Unresolvable origin/destination codes arrive here as the raw code;
/// unresolvable cities are already dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedNames {
    pub origin_airport_name: String,
    pub destination_country_name: String,
    pub city_names: Vec<String>,
}

/// Example of the exact JSON the model must return, with placeholders.
const RESPONSE_SHAPE: &str = r#"{
  "tripName": "string",
  "budgetItinerary": {
    "summary": "string",
    "dailyPlans": [
      {
        "day": 1,
        "activities": [
          { "time": "string", "description": "string", "cost": 0 }
        ],
        "accommodation": { "name": "string", "cost": 0 },
        "meals": {
          "breakfast": { "description": "string", "cost": 0 },
          "lunch": { "description": "string", "cost": 0 },
          "dinner": { "description": "string", "cost": 0 }
        }
      }
    ],
    "totalCost": 0
  },
  "experienceItinerary": { "same shape as budgetItinerary": true }
}"#;

/// Render the instruction block for one generation call.
pub fn build_prompt(request: &TripRequest, names: &ResolvedNames) -> String {
    let days = request.duration;
    let currency = &request.currency;
    let country = &names.destination_country_name;

    let cities = if names.city_names.is_empty() {
        format!("Choose the cities to visit in {country}.")
    } else {
        format!("Only visit these cities: {}.", names.city_names.join(", "))
    };

    let lines = [
        "You are a travel planner for travelers departing from the Philippines.".to_string(),
        format!(
            "Plan a {days}-day trip to {country} departing from {} ({}) in {}.",
            names.origin_airport_name,
            request.origin_airport,
            request.month_name(),
        ),
        format!(
            "Total budget: {} {currency}. Quote every cost in {currency}.",
            request.budget
        ),
        format!("Traveler interests: {}.", request.preferences.join(", ")),
        cities,
        String::new(),
        "Produce two itineraries for the same trip:".to_string(),
        "1. budgetItinerary: minimize total cost while staying within the budget.".to_string(),
        "2. experienceItinerary: maximize the quality of the experience, using the full budget if it helps.".to_string(),
        String::new(),
        "Rules:".to_string(),
        format!(
            "- Each itinerary must have exactly {days} entries in dailyPlans, with day numbered 1 to {days} in order."
        ),
        "- Every day lists its activities, one accommodation, and breakfast, lunch, and dinner."
            .to_string(),
        format!(
            "- Every cost is a non-negative number in {currency}; totalCost is the sum for that itinerary."
        ),
        "- Respond with JSON only, no commentary, matching exactly this shape:".to_string(),
        RESPONSE_SHAPE.to_string(),
    ];

    let mut prompt = lines.join("\n");
    prompt.push('\n');
    prompt
}
