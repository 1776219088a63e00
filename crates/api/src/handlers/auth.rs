//! Handlers for the `/auth` resource: accounts, sessions, and email links.

use std::borrow::Cow;

use axum::extract::State;
use axum::http::header::{SET_COOKIE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use mapa_core::error::CoreError;
use mapa_core::identity::{normalize_email, ProviderProfile};
use mapa_core::types::{DbId, Timestamp};
use mapa_db::models::session::CreateSession;
use mapa_db::models::user::{User, UserResponse};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::auth::identity::resolve_user;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::auth::session::{clear_session_cookie, generate_session_token, session_cookie};
use crate::auth::tokens::{
    issue_reset_token, issue_verification_token, reset_token_matches, validate_reset_token,
    validate_verification_token,
};
use crate::error::{AppError, AppResult};
use crate::extract::{validate_input, AppJson};
use crate::middleware::auth::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
///
/// Fields default to empty so a missing field is reported alongside every
/// other violation instead of failing deserialization on its own.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "password_strength"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Display name must be between 1 and 100 characters"
    ))]
    pub display_name: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/verify-email`.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[serde(default)]
    #[validate(custom(function = "password_strength"))]
    pub password: String,
}

/// Successful authentication response returned by register and login.
///
/// The session token is also set as an HttpOnly cookie; the body copy is for
/// clients that prefer a Bearer header.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub session_token: String,
    pub expires_at: Timestamp,
}

fn password_strength(password: &str) -> Result<(), ValidationError> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(|msg| {
        ValidationError::new("password_strength").with_message(Cow::Owned(msg))
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create a local account, send the verification email, and start a session.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<Response> {
    validate_input(&input)?;

    let identity = ProviderProfile::Local {
        email: input.email,
        display_name: input.display_name,
    }
    .normalize()?;

    if let Some(email) = identity.email.as_deref() {
        if state.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Core(CoreError::Conflict(
                "An account with this email already exists".into(),
            )));
        }
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = resolve_user(state.users.as_ref(), &identity, Some(password_hash)).await?;
    tracing::info!(user_id = user.id, "User registered");

    send_verification_email(&state, &user);

    let auth = start_session(&state, &user, &headers).await?;
    Ok((StatusCode::CREATED, auth).into_response())
}

/// POST /api/auth/login
///
/// Authenticate with email + password. Unknown emails and wrong passwords
/// get the same answer.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Response> {
    validate_input(&input)?;

    // 1. Find user by email.
    let email = normalize_email(&input.email).unwrap_or_default();
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(invalid_credentials)?;

    // 2. Check if the account is temporarily locked.
    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    // 3. Accounts created through a provider have no password to check.
    let Some(stored_hash) = user.password_hash.as_deref() else {
        return Err(invalid_credentials());
    };

    // 4. Verify password.
    let password_valid = verify_password(&input.password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        // 5. On failure: increment counter, lock if threshold reached.
        state.users.increment_failed_login(user.id).await?;

        let new_count = user.failed_login_count + 1;
        if new_count >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            state.users.lock_account(user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, "Account locked after repeated failed logins");
        }

        return Err(invalid_credentials());
    }

    // 6. On success: reset failed count, set last_login_at.
    state.users.record_successful_login(user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    let auth = start_session(&state, &user, &headers).await?;
    Ok(auth.into_response())
}

/// POST /api/auth/logout
///
/// Revoke the current session and clear the cookie. Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
) -> AppResult<Response> {
    state.sessions.revoke(auth_user.session_id).await?;
    tracing::info!(user_id = auth_user.user_id, "User logged out");

    Ok((
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(&state.config.session))],
    )
        .into_response())
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, auth_user.user_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/auth/verify-email
///
/// Mark the account named by a verification token as verified.
pub async fn verify_email(
    State(state): State<AppState>,
    AppJson(input): AppJson<VerifyEmailRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate_input(&input)?;

    let user_id = validate_verification_token(&input.token, &state.config.tokens)
        .map_err(|e| AppError::BadRequest(format!("Verification link is invalid: {e}")))?;

    if !state.users.mark_email_verified(user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }));
    }
    tracing::info!(user_id, "Email verified");

    let user = find_user(&state, user_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/auth/forgot-password
///
/// Always 202, whether or not the email belongs to an account.
pub async fn forgot_password(
    State(state): State<AppState>,
    AppJson(input): AppJson<ForgotPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_input(&input)?;

    let email = normalize_email(&input.email).unwrap_or_default();
    let user = state.users.find_by_email(&email).await?;

    match user {
        Some(user) => match user.password_hash.as_deref() {
            Some(password_hash) => {
                let token = issue_reset_token(user.id, password_hash, &state.config.tokens)
                    .map_err(|e| {
                        AppError::InternalError(format!("Token generation error: {e}"))
                    })?;
                send_reset_email(&state, &user, token);
            }
            None => tracing::debug!(user_id = user.id, "Reset requested for provider-only account"),
        },
        None => tracing::debug!("Reset requested for unknown email"),
    }

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/auth/reset-password
///
/// Replace the password named by a reset token, then revoke every session
/// of that user. Returns 204 and clears the cookie.
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(input): AppJson<ResetPasswordRequest>,
) -> AppResult<Response> {
    validate_input(&input)?;

    let claims = validate_reset_token(&input.token, &state.config.tokens)
        .map_err(|e| AppError::BadRequest(format!("Reset link is invalid: {e}")))?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::BadRequest("Reset link is invalid".into()))?;

    let still_valid = user
        .password_hash
        .as_deref()
        .is_some_and(|hash| reset_token_matches(&claims, hash));
    if !still_valid {
        return Err(AppError::BadRequest(
            "Reset link has already been used".into(),
        ));
    }

    let new_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    state.users.update_password(user.id, &new_hash).await?;

    let revoked = state.sessions.revoke_all_for_user(user.id).await?;
    tracing::info!(user_id = user.id, revoked, "Password reset");

    Ok((
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(&state.config.session))],
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
}

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Persist a new session row and build the cookie + body response.
async fn start_session(
    state: &AppState,
    user: &User,
    headers: &HeaderMap,
) -> AppResult<([(HeaderName, String); 1], Json<AuthResponse>)> {
    let (token, token_hash) = generate_session_token();
    let expires_at = Utc::now() + Duration::days(state.config.session.ttl_days);

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty());

    let session = state
        .sessions
        .create(&CreateSession {
            user_id: user.id,
            token_hash,
            expires_at,
            user_agent,
            ip_address,
        })
        .await?;
    tracing::debug!(user_id = user.id, session_id = session.id, "Session started");

    let cookie = session_cookie(&state.config.session, &token);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: UserResponse::from(user),
            session_token: token,
            expires_at: session.expires_at,
        }),
    ))
}

/// Issue a verification token and mail it on a background task.
fn send_verification_email(state: &AppState, user: &User) {
    let Some(mailer) = state.mailer.clone() else {
        tracing::info!(user_id = user.id, "SMTP not configured, skipping verification email");
        return;
    };
    let token = match issue_verification_token(user.id, &state.config.tokens) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(user_id = user.id, error = %e, "Failed to issue verification token");
            return;
        }
    };

    let expiry_hours = state.config.tokens.email_verify_expiry_hours;
    let (user_id, email, name) = (user.id, user.email.clone(), user.display_name.clone());
    tokio::spawn(async move {
        if let Err(e) = mailer
            .send_verification(&email, &name, &token, expiry_hours)
            .await
        {
            tracing::warn!(user_id, error = %e, "Failed to send verification email");
        }
    });
}

/// Mail a password reset link on a background task.
fn send_reset_email(state: &AppState, user: &User, token: String) {
    let Some(mailer) = state.mailer.clone() else {
        tracing::info!(user_id = user.id, "SMTP not configured, skipping reset email");
        return;
    };

    let expiry_mins = state.config.tokens.password_reset_expiry_mins;
    let (user_id, email, name) = (user.id, user.email.clone(), user.display_name.clone());
    tokio::spawn(async move {
        if let Err(e) = mailer
            .send_password_reset(&email, &name, &token, expiry_mins)
            .await
        {
            tracing::warn!(user_id, error = %e, "Failed to send password reset email");
        }
    });
}

