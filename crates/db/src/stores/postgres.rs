//! PostgreSQL-backed stores. Each one is a thin wrapper that hands its pool
//! to the matching repository.

use async_trait::async_trait;
use mapa_core::identity::IdentityProvider;
use mapa_core::types::{DbId, Timestamp};

use super::{ReferenceStore, SessionStore, TripStore, UserStore};
use crate::models::reference::{Airport, City, Country, Currency, Preference};
use crate::models::session::{CreateSession, UserSession};
use crate::models::trip::{CreateTrip, Trip, UpdateTrip};
use crate::models::user::{CreateUser, User};
use crate::repositories::{ReferenceRepo, SessionRepo, TripRepo, UserRepo};
use crate::DbPool;

#[derive(Clone)]
pub struct PgTripStore {
    pool: DbPool,
}

impl PgTripStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripStore for PgTripStore {
    async fn create(&self, user_id: DbId, input: &CreateTrip) -> Result<Trip, sqlx::Error> {
        TripRepo::create(&self.pool, user_id, input).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Trip>, sqlx::Error> {
        TripRepo::find_by_id(&self.pool, id).await
    }

    async fn list_by_user(&self, user_id: DbId) -> Result<Vec<Trip>, sqlx::Error> {
        TripRepo::list_by_user(&self.pool, user_id).await
    }

    async fn update(&self, id: DbId, input: &UpdateTrip) -> Result<Option<Trip>, sqlx::Error> {
        TripRepo::update(&self.pool, id, input).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        TripRepo::delete(&self.pool, id).await
    }
}

#[derive(Clone)]
pub struct PgReferenceStore {
    pool: DbPool,
}

impl PgReferenceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceStore for PgReferenceStore {
    async fn list_airports(&self) -> Result<Vec<Airport>, sqlx::Error> {
        ReferenceRepo::list_airports(&self.pool).await
    }

    async fn find_airport(&self, code: &str) -> Result<Option<Airport>, sqlx::Error> {
        ReferenceRepo::find_airport(&self.pool, code).await
    }

    async fn list_countries(&self) -> Result<Vec<Country>, sqlx::Error> {
        ReferenceRepo::list_countries(&self.pool).await
    }

    async fn find_country(&self, code: &str) -> Result<Option<Country>, sqlx::Error> {
        ReferenceRepo::find_country(&self.pool, code).await
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, sqlx::Error> {
        ReferenceRepo::list_currencies(&self.pool).await
    }

    async fn list_preferences(&self) -> Result<Vec<Preference>, sqlx::Error> {
        ReferenceRepo::list_preferences(&self.pool).await
    }

    async fn list_cities(&self, country_code: &str) -> Result<Vec<City>, sqlx::Error> {
        ReferenceRepo::list_cities(&self.pool, country_code).await
    }

    async fn find_cities(
        &self,
        country_code: &str,
        codes: &[String],
    ) -> Result<Vec<City>, sqlx::Error> {
        ReferenceRepo::find_cities(&self.pool, country_code, codes).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error> {
        UserRepo::create(&self.pool, input).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_id(&self.pool, id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_email(&self.pool, email).await
    }

    async fn find_by_provider(
        &self,
        provider: IdentityProvider,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_provider(&self.pool, provider, subject).await
    }

    async fn link_provider(
        &self,
        id: DbId,
        provider: IdentityProvider,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        UserRepo::link_provider(&self.pool, id, provider, subject).await
    }

    async fn mark_email_verified(&self, id: DbId) -> Result<bool, sqlx::Error> {
        UserRepo::mark_email_verified(&self.pool, id).await
    }

    async fn increment_failed_login(&self, id: DbId) -> Result<(), sqlx::Error> {
        UserRepo::increment_failed_login(&self.pool, id).await
    }

    async fn lock_account(&self, id: DbId, until: Timestamp) -> Result<(), sqlx::Error> {
        UserRepo::lock_account(&self.pool, id, until).await
    }

    async fn record_successful_login(&self, id: DbId) -> Result<(), sqlx::Error> {
        UserRepo::record_successful_login(&self.pool, id).await
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error> {
        UserRepo::update_password(&self.pool, id, password_hash).await
    }
}

#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        SessionRepo::create(&self.pool, input).await
    }

    async fn find_active_by_token_hash(
        &self,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        SessionRepo::find_active_by_token_hash(&self.pool, hash).await
    }

    async fn revoke(&self, id: DbId) -> Result<bool, sqlx::Error> {
        SessionRepo::revoke(&self.pool, id).await
    }

    async fn revoke_all_for_user(&self, user_id: DbId) -> Result<u64, sqlx::Error> {
        SessionRepo::revoke_all_for_user(&self.pool, user_id).await
    }

    async fn cleanup_expired(&self) -> Result<u64, sqlx::Error> {
        SessionRepo::cleanup_expired(&self.pool).await
    }
}
