//! Gemini `generateContent` transport and the generator seam.

use async_trait::async_trait;
use mapa_core::itinerary::GeneratedTrip;
use mapa_core::trip_request::TripRequest;
use serde::Deserialize;

use crate::config::GenAiConfig;
use crate::error::GenerationError;
use crate::parse::parse_generated_trip;
use crate::prompt::{build_prompt, ResolvedNames};

/// Anything that can turn a trip request into two itineraries.
///
/// The HTTP layer holds an `Arc<dyn ItineraryGenerator>`; tests script it.
#[async_trait]
pub trait ItineraryGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &TripRequest,
        names: &ResolvedNames,
    ) -> Result<GeneratedTrip, GenerationError>;
}

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GenAiConfig,
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Build a client with the configured per-call timeout.
    pub fn new(config: GenAiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenerationError::Configuration(format!("HTTP client setup: {e}")))?;
        Ok(Self { client, config })
    }

    /// Whether an API key is present. Used for the startup warning.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Send one prompt and return the concatenated text of the first candidate.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            GenerationError::Configuration("GEMINI_API_KEY is not set".into())
        })?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;

        let envelope: GenerateContentResponse = response.json().await.map_err(|e| {
            GenerationError::Service(format!("malformed response envelope: {e}"))
        })?;

        Self::candidate_text(envelope)
    }

    // ---- private helpers ----

    /// Map a non-2xx status to the matching error kind. Rejected keys are a
    /// configuration problem; everything else is a service failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let rejected_key = status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
            || (status == reqwest::StatusCode::BAD_REQUEST && body.contains("API_KEY_INVALID"));

        if rejected_key {
            Err(GenerationError::Configuration(format!(
                "API key rejected ({}): {body}",
                status.as_u16()
            )))
        } else {
            Err(GenerationError::Service(format!(
                "Gemini API error ({}): {body}",
                status.as_u16()
            )))
        }
    }

    fn candidate_text(envelope: GenerateContentResponse) -> Result<String, GenerationError> {
        let content = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| GenerationError::Service("response has no candidates".into()))?;

        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            return Err(GenerationError::Service("candidate has no text".into()));
        }
        Ok(text)
    }
}

#[async_trait]
impl ItineraryGenerator for GeminiClient {
    async fn generate(
        &self,
        request: &TripRequest,
        names: &ResolvedNames,
    ) -> Result<GeneratedTrip, GenerationError> {
        let prompt = build_prompt(request, names);
        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            duration = request.duration,
            "Requesting itinerary generation"
        );

        let raw = self.generate_text(&prompt).await?;
        let trip = parse_generated_trip(&raw, request.duration).inspect_err(|e| {
            tracing::warn!(error = %e, raw_len = raw.len(), "Model output rejected");
        })?;

        tracing::info!(trip_name = %trip.trip_name, "Itinerary generated");
        Ok(trip)
    }
}
