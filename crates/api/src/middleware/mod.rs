//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from the session cookie or Bearer token.
//! - [`auth::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
