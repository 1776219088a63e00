//! Opaque session tokens and the session cookie.
//!
//! A session token is a random UUID handed to the client; only its SHA-256
//! hash is stored server-side so a database leak does not expose live
//! sessions. Clients present it in the session cookie or as a Bearer token.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{env_or, ConfigError};

/// Default cookie name.
const DEFAULT_COOKIE_NAME: &str = "mapa_session";
/// Default session lifetime in days.
const DEFAULT_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_days: i64,
    /// Adds the `Secure` attribute. Enable behind HTTPS.
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            ttl_days: DEFAULT_TTL_DAYS,
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    /// Load session settings from environment variables.
    ///
    /// | Env Var                 | Default        |
    /// |-------------------------|----------------|
    /// | `SESSION_COOKIE_NAME`   | `mapa_session` |
    /// | `SESSION_TTL_DAYS`      | `7`            |
    /// | `SESSION_COOKIE_SECURE` | `false`        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_COOKIE_NAME.into()),
            ttl_days: env_or("SESSION_TTL_DAYS", DEFAULT_TTL_DAYS)?,
            cookie_secure: env_or("SESSION_COOKIE_SECURE", false)?,
        })
    }

    pub fn max_age_secs(&self) -> i64 {
        self.ttl_days * 24 * 60 * 60
    }
}

/// Generate a fresh session token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext goes to the
/// client; only the hash is persisted.
pub fn generate_session_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// `Set-Cookie` value that stores `token` for the configured lifetime.
pub fn session_cookie(config: &SessionConfig, token: &str) -> String {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{secure}",
        config.cookie_name,
        config.max_age_secs()
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{secure}",
        config.cookie_name
    )
}

/// Session token from the request: the named cookie first, then a
/// `Bearer` authorization header.
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}
