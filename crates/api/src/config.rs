use std::str::FromStr;

use axum::http::HeaderValue;
use mapa_genai::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use mapa_genai::GenAiConfig;

use crate::auth::session::SessionConfig;
use crate::auth::tokens::TokenConfig;

/// Startup configuration failure. Reported once by the binary, then it exits.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the token secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `90`). Generation calls take
    /// several seconds, so this sits above the Gemini timeout.
    pub request_timeout_secs: u64,
    /// Front-end root used in email links.
    pub app_base_url: String,
    pub session: SessionConfig,
    pub tokens: TokenConfig,
    pub genai: GenAiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `90`                       |
    /// | `APP_BASE_URL`         | `http://localhost:5173`    |
    ///
    /// Session and token settings are read by [`SessionConfig::from_env`] and
    /// [`TokenConfig::from_env`]; generation settings by [`genai_from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 5000)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.clone(),
                });
            }
        }

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 90)?;

        let app_base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_base_url,
            session: SessionConfig::from_env()?,
            tokens: TokenConfig::from_env()?,
            genai: genai_from_env()?,
        })
    }
}

/// Load Gemini settings from environment variables.
///
/// | Env Var               | Required | Default                                     |
/// |-----------------------|----------|---------------------------------------------|
/// | `GEMINI_API_KEY`      | no       | --                                          |
/// | `GEMINI_MODEL`        | no       | `gemini-1.5-flash`                          |
/// | `GEMINI_BASE_URL`     | no       | `https://generativelanguage.googleapis.com` |
/// | `GEMINI_TIMEOUT_SECS` | no       | `60`                                        |
///
/// A blank `GEMINI_API_KEY` counts as unset.
pub fn genai_from_env() -> Result<GenAiConfig, ConfigError> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    Ok(GenAiConfig {
        api_key,
        model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
        base_url: std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string(),
        timeout_secs: env_or("GEMINI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
    })
}

/// Read `var` and parse it, falling back to `default` when unset.
pub(crate) fn env_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}
