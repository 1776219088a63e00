//! Repository for the `trips` table.
//!
//! Owner-agnostic: callers check `trip.user_id` before acting on a row.

use mapa_core::trip::STATUS_PLANNED;
use mapa_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::trip::{CreateTrip, Trip, UpdateTrip};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, trip_name, origin_airport, destination_country, \
                        travel_month, currency, duration, budget, preferences, selected_cities, \
                        budget_itinerary, experience_itinerary, status, created_at, updated_at";

/// Provides CRUD operations for trips.
pub struct TripRepo;

impl TripRepo {
    /// Insert a new trip owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTrip,
    ) -> Result<Trip, sqlx::Error> {
        let query = format!(
            "INSERT INTO trips (user_id, trip_name, origin_airport, destination_country,
                                travel_month, currency, duration, budget, preferences,
                                selected_cities, budget_itinerary, experience_itinerary, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(user_id)
            .bind(&input.trip_name)
            .bind(&input.origin_airport)
            .bind(&input.destination_country)
            .bind(input.travel_month)
            .bind(&input.currency)
            .bind(input.duration)
            .bind(input.budget)
            .bind(&input.preferences)
            .bind(&input.selected_cities)
            .bind(input.budget_itinerary.as_ref().map(Json))
            .bind(input.experience_itinerary.as_ref().map(Json))
            .bind(input.status.as_deref().unwrap_or(STATUS_PLANNED))
            .fetch_one(pool)
            .await
    }

    /// Find a trip by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trips WHERE id = $1");
        sqlx::query_as::<_, Trip>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's trips, most recently created first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Trip>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trips WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a trip. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrip,
    ) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!(
            "UPDATE trips SET
                trip_name = COALESCE($2, trip_name),
                origin_airport = COALESCE($3, origin_airport),
                destination_country = COALESCE($4, destination_country),
                travel_month = COALESCE($5, travel_month),
                currency = COALESCE($6, currency),
                duration = COALESCE($7, duration),
                budget = COALESCE($8, budget),
                preferences = COALESCE($9, preferences),
                selected_cities = COALESCE($10, selected_cities),
                budget_itinerary = COALESCE($11, budget_itinerary),
                experience_itinerary = COALESCE($12, experience_itinerary),
                status = COALESCE($13, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(id)
            .bind(&input.trip_name)
            .bind(&input.origin_airport)
            .bind(&input.destination_country)
            .bind(input.travel_month)
            .bind(&input.currency)
            .bind(input.duration)
            .bind(input.budget)
            .bind(&input.preferences)
            .bind(&input.selected_cities)
            .bind(input.budget_itinerary.as_ref().map(Json))
            .bind(input.experience_itinerary.as_ref().map(Json))
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a trip by ID. Deleting a missing row is not an error.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
