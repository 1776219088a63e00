//! Trip-generation request schema and validation.
//!
//! A [`TripRequest`] only exists for the duration of one generation call.
//! It is built from a raw JSON body by [`TripRequest::from_json`], which
//! reports every field-level violation at once.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::validation::{violations_from, FieldReader, FieldViolation};

/// Shortest trip the planner will generate, in days.
pub const MIN_DURATION_DAYS: i64 = 1;

/// Longest trip the planner will generate, in days.
pub const MAX_DURATION_DAYS: i64 = 30;

/// Raw request body as the client sends it. Every field is optional here so
/// that a missing or mistyped field is reported as a violation instead of
/// aborting the read.
#[derive(Debug, Validate)]
struct TripRequestInput {
    #[validate(
        required(message = "Origin airport is required"),
        length(min = 1, message = "Origin airport is required")
    )]
    origin_airport: Option<String>,

    #[validate(
        required(message = "Destination country is required"),
        length(min = 1, message = "Destination country is required")
    )]
    destination_country: Option<String>,

    #[validate(
        required(message = "Travel month is required"),
        range(min = 1, max = 12, message = "Travel month must be between 1 and 12")
    )]
    travel_month: Option<i64>,

    #[validate(
        required(message = "Currency is required"),
        length(min = 1, message = "Currency is required")
    )]
    currency: Option<String>,

    #[validate(
        required(message = "Duration is required"),
        range(min = 1, max = 30, message = "Duration must be between 1 and 30 days")
    )]
    duration: Option<i64>,

    #[validate(
        required(message = "Budget is required"),
        range(min = 1, message = "Budget must be a positive amount")
    )]
    budget: Option<i64>,

    #[validate(
        required(message = "Select at least one travel preference"),
        length(min = 1, message = "Select at least one travel preference")
    )]
    preferences: Option<Vec<String>>,

    selected_cities: Option<Vec<String>>,
}

impl TripRequestInput {
    fn read(reader: &mut FieldReader) -> Self {
        Self {
            origin_airport: reader.optional("originAirport"),
            destination_country: reader.optional("destinationCountry"),
            travel_month: reader.optional("travelMonth"),
            currency: reader.optional("currency"),
            duration: reader.optional("duration"),
            budget: reader.optional("budget"),
            preferences: reader.optional("preferences"),
            selected_cities: reader.optional("selectedCities"),
        }
    }
}

/// A validated trip-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub origin_airport: String,
    pub destination_country: String,
    /// 1 = January ... 12 = December.
    pub travel_month: u32,
    pub currency: String,
    /// Trip length in days, `1..=30`.
    pub duration: u32,
    /// Total budget in `currency`, always positive.
    pub budget: u64,
    /// Non-empty, de-duplicated, in client order.
    pub preferences: Vec<String>,
    /// City codes within `destination_country`; may be empty.
    #[serde(default)]
    pub selected_cities: Vec<String>,
}

impl TripRequest {
    /// Validate a raw JSON body into a [`TripRequest`].
    ///
    /// Returns [`CoreError::InvalidFields`] listing every violation, sorted by
    /// field path. A mistyped field is reported at its own path alongside the
    /// range and presence failures of the other fields.
    ///
    /// Airport, country, currency and city codes are trimmed and uppercased.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let mut reader = FieldReader::new(value)?;
        let input = TripRequestInput::read(&mut reader);

        let mut violations: Vec<FieldViolation> = match input.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => violations_from(&errors)
                .into_iter()
                .filter(|v| !reader.has_violation(&v.field))
                .collect(),
        };
        violations.extend(reader.into_violations());
        violations.extend(blank_entries("preferences", input.preferences.as_deref()));
        violations.extend(blank_entries(
            "selectedCities",
            input.selected_cities.as_deref(),
        ));
        violations.extend(blank_code("originAirport", input.origin_airport.as_deref()));
        violations.extend(blank_code(
            "destinationCountry",
            input.destination_country.as_deref(),
        ));
        violations.extend(blank_code("currency", input.currency.as_deref()));

        if !violations.is_empty() {
            violations.sort_by(|a, b| a.field.cmp(&b.field));
            violations.dedup();
            return Err(CoreError::InvalidFields(violations));
        }

        // All `required` checks passed above, so every field is present.
        let (
            Some(origin_airport),
            Some(destination_country),
            Some(travel_month),
            Some(currency),
            Some(duration),
            Some(budget),
            Some(preferences),
        ) = (
            input.origin_airport,
            input.destination_country,
            input.travel_month,
            input.currency,
            input.duration,
            input.budget,
            input.preferences,
        )
        else {
            return Err(CoreError::Internal(
                "trip request passed validation with missing fields".into(),
            ));
        };

        let selected_cities = input
            .selected_cities
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .map(normalize_code)
            .collect();

        Ok(Self {
            origin_airport: normalize_code(&origin_airport),
            destination_country: normalize_code(&destination_country),
            travel_month: travel_month as u32,
            currency: normalize_code(&currency),
            duration: duration as u32,
            budget: budget as u64,
            preferences: dedup_trimmed(preferences),
            selected_cities: dedup_trimmed(selected_cities),
        })
    }

    /// English name of the travel month, e.g. `"April"`.
    pub fn month_name(&self) -> &'static str {
        month_name(self.travel_month)
    }
}

/// English month name for `1..=12`; anything else yields `"Unknown"`.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

fn blank_entries(field: &str, entries: Option<&[String]>) -> Vec<FieldViolation> {
    entries
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter(|(_, code)| code.trim().is_empty())
        .map(|(i, _)| FieldViolation::new(format!("{field}[{i}]"), "Code must not be blank"))
        .collect()
}

fn blank_code(field: &str, code: Option<&str>) -> Option<FieldViolation> {
    match code {
        Some(c) if !c.is_empty() && c.trim().is_empty() => {
            Some(FieldViolation::new(field, "Code must not be blank"))
        }
        _ => None,
    }
}

/// Reference codes are stored uppercase (`MNL`, `JPN`, `TYO`).
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn dedup_trimmed(codes: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes {
        let code = code.trim().to_string();
        if !out.contains(&code) {
            out.push(code);
        }
    }
    out
}
