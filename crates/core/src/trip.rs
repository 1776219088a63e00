//! Trip record status values and field rules.

use crate::error::CoreError;
use crate::itinerary::Itinerary;
use crate::trip_request::{MAX_DURATION_DAYS, MIN_DURATION_DAYS};

/* --------------------------------------------------------------------------
   Status constants
   -------------------------------------------------------------------------- */

/// Saved but not yet started.
pub const STATUS_PLANNED: &str = "planned";

/// The traveler is on the trip.
pub const STATUS_ONGOING: &str = "ongoing";

/// The trip is over.
pub const STATUS_COMPLETED: &str = "completed";

/// The trip will not happen.
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid trip status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PLANNED,
    STATUS_ONGOING,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

/// Maximum length for a trip name.
pub const MAX_TRIP_NAME_LEN: usize = 200;

/* --------------------------------------------------------------------------
   Validation functions
   -------------------------------------------------------------------------- */

/// Validate that `status` is one of the allowed values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate a trip name: non-blank and within length limit.
pub fn validate_trip_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Trip name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_TRIP_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Trip name too long: {} chars (max {MAX_TRIP_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

pub fn validate_duration(duration: i32) -> Result<(), CoreError> {
    let d = i64::from(duration);
    if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&d) {
        return Err(CoreError::Validation(format!(
            "Duration must be between {MIN_DURATION_DAYS} and {MAX_DURATION_DAYS} days, got {duration}"
        )));
    }
    Ok(())
}

pub fn validate_budget(budget: i64) -> Result<(), CoreError> {
    if budget < 1 {
        return Err(CoreError::Validation(format!(
            "Budget must be a positive amount, got {budget}"
        )));
    }
    Ok(())
}

pub fn validate_travel_month(month: i32) -> Result<(), CoreError> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::Validation(format!(
            "Travel month must be between 1 and 12, got {month}"
        )));
    }
    Ok(())
}

/// A saved itinerary must still describe a trip of the saved duration.
pub fn validate_itinerary_for_duration(
    label: &str,
    itinerary: Option<&Itinerary>,
    duration: i32,
) -> Result<(), CoreError> {
    let Some(itinerary) = itinerary else {
        return Ok(());
    };
    let duration = u32::try_from(duration)
        .map_err(|_| CoreError::Validation(format!("Invalid duration {duration}")))?;
    itinerary.check_shape(duration).map_err(|e| match e {
        CoreError::Validation(msg) => CoreError::Validation(format!("{label}: {msg}")),
        other => other,
    })
}
