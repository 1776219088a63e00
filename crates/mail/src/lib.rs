//! Transactional email for account flows.
//!
//! [`messages`] renders plain-text bodies; [`delivery`] sends them over SMTP.

pub mod delivery;
pub mod messages;

pub use delivery::{EmailConfig, EmailDelivery, EmailError};
