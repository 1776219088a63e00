//! Repository for the `users` table.

use mapa_core::identity::IdentityProvider;
use mapa_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, display_name, password_hash, email_verified, google_id, \
                        facebook_id, failed_login_count, locked_until, last_login_at, \
                        created_at, updated_at";

/// Column holding the provider-side subject, for providers that link by id.
fn provider_column(provider: IdentityProvider) -> Option<&'static str> {
    match provider {
        IdentityProvider::Local => None,
        IdentityProvider::Google => Some("google_id"),
        IdentityProvider::Facebook => Some("facebook_id"),
    }
}

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, password_hash, email_verified,
                                google_id, facebook_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .bind(input.email_verified)
            .bind(&input.google_id)
            .bind(&input.facebook_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lowercased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by provider subject. Local subjects are emails.
    pub async fn find_by_provider(
        pool: &PgPool,
        provider: IdentityProvider,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let Some(column) = provider_column(provider) else {
            return Self::find_by_email(pool, subject).await;
        };
        let query = format!("SELECT {COLUMNS} FROM users WHERE {column} = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(subject)
            .fetch_optional(pool)
            .await
    }

    /// Attach a provider subject to an existing user.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn link_provider(
        pool: &PgPool,
        id: DbId,
        provider: IdentityProvider,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let Some(column) = provider_column(provider) else {
            return Self::find_by_id(pool, id).await;
        };
        let query = format!(
            "UPDATE users SET {column} = $2, email_verified = true
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(subject)
            .fetch_optional(pool)
            .await
    }

    /// Mark the user's email as verified. Returns `true` if the row was updated.
    pub async fn mark_email_verified(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET email_verified = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the failed login counter by 1.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET failed_login_count = failed_login_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Lock a user account until the specified timestamp. The failure counter
    /// restarts so the account gets a fresh set of attempts once unlocked.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2, failed_login_count = 0 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful login: reset `failed_login_count` to 0, clear `locked_until`,
    /// and set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the password hash and clear any lockout. Returns `true` if the
    /// row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                password_hash = $2,
                failed_login_count = 0,
                locked_until = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
