//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- opaque session tokens and the session cookie.
//! - [`tokens`] -- signed, purpose-scoped tokens for email verification and
//!   password reset.
//! - [`identity`] -- resolving a normalized provider identity to a user.

pub mod identity;
pub mod password;
pub mod session;
pub mod tokens;
