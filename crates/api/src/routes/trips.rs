//! Route definitions for the `/trips` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::trips;
use crate::state::AppState;

/// Routes mounted at `/trips`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PATCH  /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trips::list).post(trips::create))
        .route(
            "/{id}",
            get(trips::get_by_id)
                .patch(trips::update)
                .delete(trips::delete),
        )
}
