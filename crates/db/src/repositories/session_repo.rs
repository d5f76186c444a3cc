//! Repository for `user_sessions`, one row per issued refresh token.

use cybersim_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                       user_agent, ip_address, created_at, updated_at";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateSession,
    ) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(executor)
            .await
    }

    /// The unrevoked, unexpired session issued for `hash`.
    pub async fn find_active(pool: &PgPool, hash: &str) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE refresh_token_hash = $1
               AND NOT is_revoked
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Swap the session issued for `old_hash` for a new one.
    ///
    /// The old row is revoked and the new one inserted in a single
    /// transaction. Returns `None`, inserting nothing, when `old_hash` is
    /// unknown, expired or already rotated, so a refresh token works once.
    pub async fn rotate(
        pool: &PgPool,
        old_hash: &str,
        next: &CreateSession,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let revoked: Option<DbId> = sqlx::query_scalar(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1
               AND user_id = $2
               AND NOT is_revoked
               AND expires_at > NOW()
             RETURNING id",
        )
        .bind(old_hash)
        .bind(next.user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if revoked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let session = Self::create(&mut *tx, next).await?;
        tx.commit().await?;
        Ok(Some(session))
    }

    /// Revoke every live session of a user (logout). Returns how many.
    pub async fn revoke_all(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND NOT is_revoked",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
