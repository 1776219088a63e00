//! Handlers for the `/trips` resource. Every operation is scoped to the caller.
//!
//! Bodies are read field by field with [`FieldReader`] so a missing or
//! mistyped field is reported next to every other violation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mapa_core::error::CoreError;
use mapa_core::itinerary::Itinerary;
use mapa_core::trip::{
    validate_budget, validate_duration, validate_itinerary_for_duration, validate_status,
    validate_travel_month, validate_trip_name,
};
use mapa_core::trip_request::normalize_code;
use mapa_core::types::DbId;
use mapa_core::validation::FieldReader;
use mapa_db::models::trip::{CreateTrip, Trip, UpdateTrip};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/trips
///
/// The owner is always the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppJson(body): AppJson<serde_json::Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Trip>>)> {
    let input = read_create(body)?;
    let trip = state.trips.create(user.user_id, &input).await?;
    tracing::info!(user_id = user.user_id, trip_id = trip.id, "Trip saved");
    Ok((StatusCode::CREATED, Json(DataResponse { data: trip })))
}

/// GET /api/trips
///
/// The caller's trips, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Trip>>>> {
    let trips = state.trips.list_by_user(user.user_id).await?;
    Ok(Json(DataResponse { data: trips }))
}

/// GET /api/trips/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Trip>>> {
    let trip = find_owned(&state, user.user_id, id).await?;
    Ok(Json(DataResponse { data: trip }))
}

/// PATCH /api/trips/{id}
///
/// Partial update. An empty body returns the current record unchanged.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    AppJson(body): AppJson<serde_json::Value>,
) -> AppResult<Json<DataResponse<Trip>>> {
    let existing = find_owned(&state, user.user_id, id).await?;

    let mut reader = FieldReader::new(body)?;
    let input = read_update(&mut reader);

    // Itineraries must fit the duration the row will have after the update,
    // whether the itinerary or the duration is the field being changed.
    if !input.is_empty() && !reader.has_violation("duration") {
        let duration = input.duration.unwrap_or(existing.duration);
        let budget_itinerary = input
            .budget_itinerary
            .as_ref()
            .or(existing.budget_itinerary.as_ref().map(|json| &json.0));
        let experience_itinerary = input
            .experience_itinerary
            .as_ref()
            .or(existing.experience_itinerary.as_ref().map(|json| &json.0));
        check_itineraries(&mut reader, budget_itinerary, experience_itinerary, duration);
    }
    reader.finish()?;

    if input.is_empty() {
        return Ok(Json(DataResponse { data: existing }));
    }

    let trip = state
        .trips
        .update(id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Trip", id }))?;
    tracing::info!(user_id = user.user_id, trip_id = id, "Trip updated");
    Ok(Json(DataResponse { data: trip }))
}

/// DELETE /api/trips/{id}
///
/// 204 on removal, 404 when the trip is already gone.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned(&state, user.user_id, id).await?;

    if state.trips.delete(id).await? {
        tracing::info!(user_id = user.user_id, trip_id = id, "Trip deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Trip", id }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a trip and verify the caller owns it.
async fn find_owned(state: &AppState, user_id: DbId, id: DbId) -> AppResult<Trip> {
    let trip = state
        .trips
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Trip", id }))?;

    if trip.user_id != user_id {
        tracing::warn!(user_id, trip_id = id, "Trip access denied");
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this trip".into(),
        )));
    }
    Ok(trip)
}

/// Read and check a full trip body. Missing required fields, wrong types and
/// out-of-range values all land in one violation list, in field order.
fn read_create(body: serde_json::Value) -> Result<CreateTrip, CoreError> {
    let mut r = FieldReader::new(body)?;

    let trip_name: Option<String> = r.required("tripName", "Trip name is required");
    if let Some(name) = trip_name.as_deref() {
        r.check("tripName", validate_trip_name(name));
    }
    let origin_airport: Option<String> =
        r.required("originAirport", "Origin airport is required");
    let destination_country: Option<String> =
        r.required("destinationCountry", "Destination country is required");
    let travel_month: Option<i32> = r.required("travelMonth", "Travel month is required");
    if let Some(month) = travel_month {
        r.check("travelMonth", validate_travel_month(month));
    }
    let currency: Option<String> = r.required("currency", "Currency is required");
    let duration: Option<i32> = r.required("duration", "Duration is required");
    if let Some(days) = duration {
        r.check("duration", validate_duration(days));
    }
    let budget: Option<i64> = r.required("budget", "Budget is required");
    if let Some(amount) = budget {
        r.check("budget", validate_budget(amount));
    }
    let preferences: Vec<String> = r.optional("preferences").unwrap_or_default();
    let selected_cities: Vec<String> = r.optional("selectedCities").unwrap_or_default();
    let status: Option<String> = r.optional("status");
    if let Some(status) = status.as_deref() {
        r.check("status", validate_status(status));
    }
    let budget_itinerary: Option<Itinerary> = r.optional("budgetItinerary");
    let experience_itinerary: Option<Itinerary> = r.optional("experienceItinerary");
    if let Some(days) = duration.filter(|_| !r.has_violation("duration")) {
        check_itineraries(
            &mut r,
            budget_itinerary.as_ref(),
            experience_itinerary.as_ref(),
            days,
        );
    }
    r.finish()?;

    let (
        Some(trip_name),
        Some(origin_airport),
        Some(destination_country),
        Some(travel_month),
        Some(currency),
        Some(duration),
        Some(budget),
    ) = (
        trip_name,
        origin_airport,
        destination_country,
        travel_month,
        currency,
        duration,
        budget,
    )
    else {
        return Err(CoreError::Internal(
            "trip body passed validation with missing fields".into(),
        ));
    };

    Ok(CreateTrip {
        trip_name,
        origin_airport: normalize_code(&origin_airport),
        destination_country: normalize_code(&destination_country),
        travel_month,
        currency: normalize_code(&currency),
        duration,
        budget,
        preferences,
        selected_cities: selected_cities.iter().map(String::as_str).map(normalize_code).collect(),
        budget_itinerary,
        experience_itinerary,
        status,
    })
}

/// Read whichever trip fields are present, checking each one.
fn read_update(r: &mut FieldReader) -> UpdateTrip {
    let trip_name: Option<String> = r.optional("tripName");
    if let Some(name) = trip_name.as_deref() {
        r.check("tripName", validate_trip_name(name));
    }
    let origin_airport: Option<String> = r.optional("originAirport");
    let destination_country: Option<String> = r.optional("destinationCountry");
    let travel_month: Option<i32> = r.optional("travelMonth");
    if let Some(month) = travel_month {
        r.check("travelMonth", validate_travel_month(month));
    }
    let currency: Option<String> = r.optional("currency");
    let duration: Option<i32> = r.optional("duration");
    if let Some(days) = duration {
        r.check("duration", validate_duration(days));
    }
    let budget: Option<i64> = r.optional("budget");
    if let Some(amount) = budget {
        r.check("budget", validate_budget(amount));
    }
    let preferences: Option<Vec<String>> = r.optional("preferences");
    let selected_cities: Option<Vec<String>> = r.optional("selectedCities");
    let status: Option<String> = r.optional("status");
    if let Some(status) = status.as_deref() {
        r.check("status", validate_status(status));
    }

    UpdateTrip {
        trip_name,
        origin_airport: origin_airport.as_deref().map(normalize_code),
        destination_country: destination_country.as_deref().map(normalize_code),
        travel_month,
        currency: currency.as_deref().map(normalize_code),
        duration,
        budget,
        preferences,
        selected_cities: selected_cities
            .map(|codes| codes.iter().map(String::as_str).map(normalize_code).collect()),
        budget_itinerary: r.optional("budgetItinerary"),
        experience_itinerary: r.optional("experienceItinerary"),
        status,
    }
}

fn check_itineraries(
    r: &mut FieldReader,
    budget_itinerary: Option<&Itinerary>,
    experience_itinerary: Option<&Itinerary>,
    duration: i32,
) {
    for (field, itinerary) in [
        ("budgetItinerary", budget_itinerary),
        ("experienceItinerary", experience_itinerary),
    ] {
        if !r.has_violation(field) {
            r.check(
                field,
                validate_itinerary_for_duration(field, itinerary, duration),
            );
        }
    }
}
