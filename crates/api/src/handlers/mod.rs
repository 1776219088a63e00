pub mod auth;
pub mod generation;
pub mod reference;
pub mod trips;
