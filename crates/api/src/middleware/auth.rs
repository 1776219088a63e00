//! Session-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mapa_core::error::CoreError;
use mapa_core::types::DbId;

use crate::auth::session::{hash_session_token, token_from_headers};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller resolved from an active session.
///
/// The session token is read from the session cookie, falling back to an
/// `Authorization: Bearer` header. Only unrevoked, unexpired sessions count.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The session the request was authenticated with.
    pub session_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers, &state.config.session.cookie_name)
            .ok_or_else(unauthenticated)?;

        let session = state
            .sessions
            .find_active_by_token_hash(&hash_session_token(&token))
            .await?
            .ok_or_else(unauthenticated)?;

        Ok(AuthUser {
            user_id: session.user_id,
            session_id: session.id,
        })
    }
}

/// Requires any authenticated user. Rejects with 401 before the handler
/// runs, so nothing else about the request is looked at.
///
/// ```ignore
/// async fn list(RequireAuth(user): RequireAuth) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

fn unauthenticated() -> AppError {
    AppError::Core(CoreError::Unauthorized("Authentication required".into()))
}
