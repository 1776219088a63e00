//! JSON body extractor with the API's error format.
//!
//! Axum's own `Json` rejects with plain text. [`AppJson`] reports malformed
//! bodies as `BAD_REQUEST` and type mismatches as a `VALIDATION_ERROR`
//! naming the offending field path.

use axum::extract::{FromRequest, Request};
use axum::Json;
use mapa_core::error::CoreError;
use mapa_core::validation::{violations_from, FieldViolation};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        serde_path_to_error::deserialize(value)
            .map(AppJson)
            .map_err(|e| {
                let path = e.path().to_string();
                let field = if path == "." { String::new() } else { path };
                AppError::Core(CoreError::InvalidFields(vec![FieldViolation::new(
                    field,
                    e.inner().to_string(),
                )]))
            })
    }
}

/// Run `validator` rules, reporting every violation at once.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|errors| AppError::Core(CoreError::InvalidFields(violations_from(&errors))))
}
