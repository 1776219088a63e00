//! Route definition for trip generation.

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// ```text
/// POST /generate-trip  -> generate_trip (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate-trip", post(generation::generate_trip))
}
