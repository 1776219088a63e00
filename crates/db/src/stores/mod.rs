//! Store traits the HTTP layer depends on.
//!
//! Each trait has exactly one production implementation in [`postgres`].
//! Handlers only ever see `Arc<dyn ...Store>`, so tests can swap in
//! in-memory fakes.

use async_trait::async_trait;
use mapa_core::identity::IdentityProvider;
use mapa_core::types::{DbId, Timestamp};

use crate::models::reference::{Airport, City, Country, Currency, Preference};
use crate::models::session::{CreateSession, UserSession};
use crate::models::trip::{CreateTrip, Trip, UpdateTrip};
use crate::models::user::{CreateUser, User};

pub mod postgres;

pub use postgres::{PgReferenceStore, PgSessionStore, PgTripStore, PgUserStore};

/// Owner-agnostic trip persistence. Callers enforce ownership.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn create(&self, user_id: DbId, input: &CreateTrip) -> Result<Trip, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Trip>, sqlx::Error>;

    /// Newest first.
    async fn list_by_user(&self, user_id: DbId) -> Result<Vec<Trip>, sqlx::Error>;

    /// `None` when the trip does not exist.
    async fn update(&self, id: DbId, input: &UpdateTrip) -> Result<Option<Trip>, sqlx::Error>;

    /// Idempotent; `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;
}

/// Read-only reference lookups.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn list_airports(&self) -> Result<Vec<Airport>, sqlx::Error>;

    async fn find_airport(&self, code: &str) -> Result<Option<Airport>, sqlx::Error>;

    async fn list_countries(&self) -> Result<Vec<Country>, sqlx::Error>;

    async fn find_country(&self, code: &str) -> Result<Option<Country>, sqlx::Error>;

    async fn list_currencies(&self) -> Result<Vec<Currency>, sqlx::Error>;

    async fn list_preferences(&self) -> Result<Vec<Preference>, sqlx::Error>;

    async fn list_cities(&self, country_code: &str) -> Result<Vec<City>, sqlx::Error>;

    /// Matching cities in unspecified order; unknown codes are absent.
    async fn find_cities(
        &self,
        country_code: &str,
        codes: &[String],
    ) -> Result<Vec<City>, sqlx::Error>;

    /// Whether the backing store answers at all.
    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn find_by_provider(
        &self,
        provider: IdentityProvider,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn link_provider(
        &self,
        id: DbId,
        provider: IdentityProvider,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn mark_email_verified(&self, id: DbId) -> Result<bool, sqlx::Error>;

    async fn increment_failed_login(&self, id: DbId) -> Result<(), sqlx::Error>;

    async fn lock_account(&self, id: DbId, until: Timestamp) -> Result<(), sqlx::Error>;

    async fn record_successful_login(&self, id: DbId) -> Result<(), sqlx::Error>;

    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, input: &CreateSession) -> Result<UserSession, sqlx::Error>;

    /// Only unrevoked, unexpired sessions.
    async fn find_active_by_token_hash(
        &self,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error>;

    async fn revoke(&self, id: DbId) -> Result<bool, sqlx::Error>;

    async fn revoke_all_for_user(&self, user_id: DbId) -> Result<u64, sqlx::Error>;

    async fn cleanup_expired(&self) -> Result<u64, sqlx::Error>;
}
