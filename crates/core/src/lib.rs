//! Domain core for the MAPA AI trip planner.
//!
//! Pure logic with no I/O: the error taxonomy shared by every crate, the
//! trip-generation request schema and its validation, itinerary shapes,
//! trip status rules, and identity-provider normalization.

pub mod error;
pub mod identity;
pub mod itinerary;
pub mod trip;
pub mod trip_request;
pub mod types;
pub mod validation;
