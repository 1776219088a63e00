//! Model output parsing.
//!
//! Two attempts, then give up: the whole text as JSON, else the first
//! fenced code block. No partial structure is ever returned.

use mapa_core::itinerary::GeneratedTrip;

use crate::error::GenerationError;

const FENCE: &str = "```";

/// Parse raw model text into a [`GeneratedTrip`] for a `duration`-day trip.
///
/// Text that parses but does not describe exactly `duration` contiguous days
/// in both itineraries is a [`GenerationError::Parse`] as well.
pub fn parse_generated_trip(raw: &str, duration: u32) -> Result<GeneratedTrip, GenerationError> {
    let trip = match serde_json::from_str::<GeneratedTrip>(raw.trim()) {
        Ok(trip) => trip,
        Err(direct_err) => {
            let Some(block) = extract_fenced_block(raw) else {
                return Err(GenerationError::Parse(format!(
                    "response is not JSON ({direct_err}) and contains no fenced block"
                )));
            };
            serde_json::from_str::<GeneratedTrip>(block).map_err(|e| {
                GenerationError::Parse(format!("fenced block is not a valid itinerary: {e}"))
            })?
        }
    };

    trip.check_shape(duration)
        .map_err(|e| GenerationError::Parse(e.to_string()))?;

    Ok(trip)
}

/// Interior of the first triple-backtick block, trimmed.
///
/// An info string on the opening line (`json`, `JSON`, ...) is skipped.
/// Returns `None` when there is no opening fence or it is never closed.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];

    let body = match after_open.find('\n') {
        Some(newline) if is_info_string(&after_open[..newline]) => &after_open[newline + 1..],
        _ => after_open,
    };

    let close = body.find(FENCE)?;
    Some(body[..close].trim())
}

fn is_info_string(line: &str) -> bool {
    let tag = line.trim();
    tag.is_empty() || tag.chars().all(|c| c.is_ascii_alphanumeric())
}
