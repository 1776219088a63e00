pub mod auth;
pub mod generation;
pub mod health;
pub mod reference;
pub mod trips;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                   register (public)
/// /auth/login                      login (public)
/// /auth/logout                     logout (requires auth)
/// /auth/me                         current user (requires auth)
/// /auth/verify-email               confirm email (public, token)
/// /auth/forgot-password            request reset link (public)
/// /auth/reset-password             set new password (public, token)
///
/// /generate-trip                   generate itineraries (requires auth)
///
/// /trips                           list, create (requires auth, owner-scoped)
/// /trips/{id}                      get, update, delete
///
/// /airports                        reference data (public)
/// /countries
/// /currencies
/// /preferences
/// /cities/{countryCode}
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts and sessions.
        .nest("/auth", auth::router())
        // Itinerary generation.
        .merge(generation::router())
        // Saved trips.
        .nest("/trips", trips::router())
        // Read-only lookups.
        .merge(reference::router())
}
