//! Trip entity model and DTOs.
//!
//! A trip optionally carries the two itineraries returned by generation;
//! they are stored as JSONB and decoded into the core itinerary shape.

use mapa_core::itinerary::Itinerary;
use mapa_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity struct (database row)
// ---------------------------------------------------------------------------

/// A row from the `trips` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: DbId,
    pub user_id: DbId,
    pub trip_name: String,
    pub origin_airport: String,
    pub destination_country: String,
    pub travel_month: i32,
    pub currency: String,
    pub duration: i32,
    pub budget: i64,
    pub preferences: Vec<String>,
    pub selected_cities: Vec<String>,
    pub budget_itinerary: Option<Json<Itinerary>>,
    pub experience_itinerary: Option<Json<Itinerary>>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for saving a trip. The owner comes from the session, never the body.
#[derive(Debug, Clone)]
pub struct CreateTrip {
    pub trip_name: String,
    pub origin_airport: String,
    pub destination_country: String,
    pub travel_month: i32,
    pub currency: String,
    pub duration: i32,
    pub budget: i64,
    pub preferences: Vec<String>,
    pub selected_cities: Vec<String>,
    pub budget_itinerary: Option<Itinerary>,
    pub experience_itinerary: Option<Itinerary>,
    /// Defaults to `planned` when absent.
    pub status: Option<String>,
}

/// DTO for partially updating a trip. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateTrip {
    pub trip_name: Option<String>,
    pub origin_airport: Option<String>,
    pub destination_country: Option<String>,
    pub travel_month: Option<i32>,
    pub currency: Option<String>,
    pub duration: Option<i32>,
    pub budget: Option<i64>,
    pub preferences: Option<Vec<String>>,
    pub selected_cities: Option<Vec<String>>,
    pub budget_itinerary: Option<Itinerary>,
    pub experience_itinerary: Option<Itinerary>,
    pub status: Option<String>,
}

impl UpdateTrip {
    /// True when the update would not change any column.
    pub fn is_empty(&self) -> bool {
        self.trip_name.is_none()
            && self.origin_airport.is_none()
            && self.destination_country.is_none()
            && self.travel_month.is_none()
            && self.currency.is_none()
            && self.duration.is_none()
            && self.budget.is_none()
            && self.preferences.is_none()
            && self.selected_cities.is_none()
            && self.budget_itinerary.is_none()
            && self.experience_itinerary.is_none()
            && self.status.is_none()
    }
}
