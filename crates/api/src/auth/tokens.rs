//! Signed, expiring, purpose-scoped tokens for email links.
//!
//! Email verification and password reset tokens are HS256 JWTs carrying an
//! [`EmailTokenClaims`] payload. A token minted for one purpose never
//! validates for the other. Reset tokens also embed a fingerprint of the
//! password hash they were issued against, so they stop working once the
//! password changes.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mapa_core::types::DbId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{env_or, ConfigError};

/// Default verification link lifetime in hours.
const DEFAULT_EMAIL_VERIFY_EXPIRY_HOURS: i64 = 24;
/// Default reset link lifetime in minutes.
const DEFAULT_PASSWORD_RESET_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    VerifyEmail,
    ResetPassword,
}

/// JWT claims embedded in every email token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmailTokenClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub purpose: TokenPurpose,
    /// Fingerprint of the password hash at issue time. Reset tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwd: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is invalid or expired")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("token was issued for a different purpose")]
    WrongPurpose,

    #[error("token is no longer valid for this account")]
    Stale,
}

/// Configuration for email token signing and lifetimes.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    pub email_verify_expiry_hours: i64,
    pub password_reset_expiry_mins: i64,
}

impl TokenConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `JWT_SECRET`                 | **yes**  | --      |
    /// | `EMAIL_VERIFY_EXPIRY_HOURS`  | no       | `24`    |
    /// | `PASSWORD_RESET_EXPIRY_MINS` | no       | `60`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            secret,
            email_verify_expiry_hours: env_or(
                "EMAIL_VERIFY_EXPIRY_HOURS",
                DEFAULT_EMAIL_VERIFY_EXPIRY_HOURS,
            )?,
            password_reset_expiry_mins: env_or(
                "PASSWORD_RESET_EXPIRY_MINS",
                DEFAULT_PASSWORD_RESET_EXPIRY_MINS,
            )?,
        })
    }
}

/// Issue an email verification token for `user_id`.
pub fn issue_verification_token(
    user_id: DbId,
    config: &TokenConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue(
        user_id,
        TokenPurpose::VerifyEmail,
        None,
        config.email_verify_expiry_hours * 60 * 60,
        config,
    )
}

/// Issue a password reset token bound to the account's current password hash.
pub fn issue_reset_token(
    user_id: DbId,
    password_hash: &str,
    config: &TokenConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue(
        user_id,
        TokenPurpose::ResetPassword,
        Some(password_fingerprint(password_hash)),
        config.password_reset_expiry_mins * 60,
        config,
    )
}

/// Validate a verification token, returning the user id it was issued for.
pub fn validate_verification_token(token: &str, config: &TokenConfig) -> Result<DbId, TokenError> {
    let claims = validate(token, TokenPurpose::VerifyEmail, config)?;
    Ok(claims.sub)
}

/// Validate a reset token's signature, expiry, and purpose.
///
/// The caller must still check the returned fingerprint against the
/// account's current hash with [`reset_token_matches`].
pub fn validate_reset_token(
    token: &str,
    config: &TokenConfig,
) -> Result<EmailTokenClaims, TokenError> {
    validate(token, TokenPurpose::ResetPassword, config)
}

/// Whether a reset token still matches the account's current password hash.
pub fn reset_token_matches(claims: &EmailTokenClaims, password_hash: &str) -> bool {
    claims.pwd.as_deref() == Some(password_fingerprint(password_hash).as_str())
}

/// Short SHA-256 prefix of a password hash. Changes whenever the hash does.
pub fn password_fingerprint(password_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password_hash.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

fn issue(
    user_id: DbId,
    purpose: TokenPurpose,
    pwd: Option<String>,
    ttl_secs: i64,
    config: &TokenConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = EmailTokenClaims {
        sub: user_id,
        purpose,
        pwd,
        exp: now + ttl_secs,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

fn validate(
    token: &str,
    purpose: TokenPurpose,
    config: &TokenConfig,
) -> Result<EmailTokenClaims, TokenError> {
    let token_data = decode::<EmailTokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    if token_data.claims.purpose != purpose {
        return Err(TokenError::WrongPurpose);
    }
    Ok(token_data.claims)
}
