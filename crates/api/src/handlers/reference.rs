//! Read-only reference data lookups. No authentication required.

use axum::extract::{Path, State};
use axum::Json;
use mapa_db::models::reference::{Airport, City, Country, Currency, Preference};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/airports
pub async fn list_airports(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Airport>>>> {
    let data = state.reference.list_airports().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/countries
pub async fn list_countries(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Country>>>> {
    let data = state.reference.list_countries().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/currencies
pub async fn list_currencies(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Currency>>>> {
    let data = state.reference.list_currencies().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/preferences
pub async fn list_preferences(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Preference>>>> {
    let data = state.reference.list_preferences().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/cities/{countryCode}
///
/// An unknown country yields an empty list, not a 404.
pub async fn list_cities(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
) -> AppResult<Json<DataResponse<Vec<City>>>> {
    let data = state
        .reference
        .list_cities(&country_code.trim().to_uppercase())
        .await?;
    Ok(Json(DataResponse { data }))
}
