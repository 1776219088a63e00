//! Handler for `POST /generate-trip`.

use axum::extract::State;
use axum::Json;
use mapa_core::itinerary::GeneratedTrip;
use mapa_core::trip_request::TripRequest;
use mapa_db::stores::ReferenceStore;
use mapa_genai::ResolvedNames;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;

/// POST /api/generate-trip
///
/// Validate the trip request, resolve display names, and return both
/// generated itineraries unwrapped. Nothing is persisted.
pub async fn generate_trip(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppJson(body): AppJson<serde_json::Value>,
) -> AppResult<Json<GeneratedTrip>> {
    let request = TripRequest::from_json(body)?;
    let names = resolve_names(state.reference.as_ref(), &request).await;

    tracing::info!(
        user_id = user.user_id,
        destination = %request.destination_country,
        duration = request.duration,
        cities = names.city_names.len(),
        "Generating trip"
    );

    let trip = state.generator.generate(&request, &names).await?;
    Ok(Json(trip))
}

/// Look up display names for the prompt.
///
/// Never fails: an unknown origin or destination falls back to its raw code,
/// and unknown city codes are dropped. City names keep the request's order.
pub async fn resolve_names(reference: &dyn ReferenceStore, request: &TripRequest) -> ResolvedNames {
    let origin_airport_name = match reference.find_airport(&request.origin_airport).await {
        Ok(Some(airport)) => airport.name,
        Ok(None) => {
            tracing::debug!(code = %request.origin_airport, "Unknown airport, using code");
            request.origin_airport.clone()
        }
        Err(e) => {
            tracing::warn!(code = %request.origin_airport, error = %e, "Airport lookup failed");
            request.origin_airport.clone()
        }
    };

    let destination_country_name = match reference.find_country(&request.destination_country).await
    {
        Ok(Some(country)) => country.name,
        Ok(None) => {
            tracing::debug!(code = %request.destination_country, "Unknown country, using code");
            request.destination_country.clone()
        }
        Err(e) => {
            tracing::warn!(code = %request.destination_country, error = %e, "Country lookup failed");
            request.destination_country.clone()
        }
    };

    let city_names = if request.selected_cities.is_empty() {
        Vec::new()
    } else {
        match reference
            .find_cities(&request.destination_country, &request.selected_cities)
            .await
        {
            Ok(cities) => request
                .selected_cities
                .iter()
                .filter_map(|code| {
                    let found = cities.iter().find(|city| &city.code == code);
                    if found.is_none() {
                        tracing::debug!(%code, "Dropping unknown city");
                    }
                    found.map(|city| city.name.clone())
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "City lookup failed, letting the model choose");
                Vec::new()
            }
        }
    };

    ResolvedNames {
        origin_airport_name,
        destination_country_name,
        city_names,
    }
}
