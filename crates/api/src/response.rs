//! Shared response envelope types for API handlers.
//!
//! CRUD and reference responses use a `{ "data": ... }` envelope.
//! `POST /generate-trip` is the exception: it returns the generated trip
//! unwrapped.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: trips }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
