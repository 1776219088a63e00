//! Itinerary generation client.
//!
//! Turns a validated [`TripRequest`](mapa_core::trip_request::TripRequest)
//! plus resolved display names into a
//! [`GeneratedTrip`](mapa_core::itinerary::GeneratedTrip) by prompting a
//! Gemini model and parsing its text output.
//!
//! - [`prompt`] -- deterministic instruction block.
//! - [`parse`] -- whole-text JSON parse with a fenced-block fallback.
//! - [`client`] -- the [`ItineraryGenerator`] seam and the Gemini transport.

pub mod client;
pub mod config;
pub mod error;
pub mod parse;
pub mod prompt;

pub use client::{GeminiClient, ItineraryGenerator};
pub use config::GenAiConfig;
pub use error::GenerationError;
pub use prompt::ResolvedNames;
