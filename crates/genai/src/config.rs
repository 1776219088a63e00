//! Gemini connection settings.

use std::time::Duration;

/// Default model when `GEMINI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Default API root when `GEMINI_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// `None` means every call fails with a configuration error.
    pub api_key: Option<String>,
    pub model: String,
    /// API root without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GenAiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}
