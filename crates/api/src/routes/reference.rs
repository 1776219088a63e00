//! Route definitions for reference data.

use axum::routing::get;
use axum::Router;

use crate::handlers::reference;
use crate::state::AppState;

/// ```text
/// GET /airports               -> list_airports
/// GET /countries              -> list_countries
/// GET /currencies             -> list_currencies
/// GET /preferences            -> list_preferences
/// GET /cities/{countryCode}   -> list_cities
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/airports", get(reference::list_airports))
        .route("/countries", get(reference::list_countries))
        .route("/currencies", get(reference::list_currencies))
        .route("/preferences", get(reference::list_preferences))
        .route("/cities/{country_code}", get(reference::list_cities))
}
