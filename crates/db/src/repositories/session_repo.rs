//! Repository for the `user_sessions` table.
//!
//! Lookups and revocations only ever touch active sessions; the predicate
//! lives in [`ACTIVE`] so every query agrees on what "active" means.

use mapa_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, token_hash, expires_at, revoked_at, \
                       user_agent, ip_address, created_at, updated_at";

/// Not revoked and not yet expired.
const ACTIVE: &str = "revoked_at IS NULL AND expires_at > NOW()";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// The session a presented token resolves to, if it is still active.
    pub async fn find_active_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM user_sessions WHERE token_hash = $1 AND {ACTIVE}");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `revoked_at` on one active session. `false` when it was already
    /// revoked, expired, or never existed.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query =
            format!("UPDATE user_sessions SET revoked_at = NOW() WHERE id = $1 AND {ACTIVE}");
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Sign a user out everywhere. Returns how many sessions were still active.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let query =
            format!("UPDATE user_sessions SET revoked_at = NOW() WHERE user_id = $1 AND {ACTIVE}");
        let result = sqlx::query(&query).bind(user_id).execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Drop every session that can no longer authenticate.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let query = format!("DELETE FROM user_sessions WHERE NOT ({ACTIVE})");
        let result = sqlx::query(&query).execute(pool).await?;
        Ok(result.rows_affected())
    }
}
