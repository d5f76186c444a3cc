//! Repository for the `users` table.
//!
//! Every query returns the role name alongside the row, so callers never
//! need a second lookup to build a token or a [`UserResponse`].
//!
//! [`UserResponse`]: crate::models::user::UserResponse

use cybersim_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Select list over `users u JOIN roles r`.
const USER_COLUMNS: &str = "u.id, u.username, u.email, u.password_hash, u.role_id, \
                            r.name AS role, u.is_active, u.last_login_at, \
                            u.failed_login_count, u.locked_until, u.created_at, u.updated_at";

/// Outcome of [`UserRepo::record_failed_login`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedLogin {
    pub failed_login_count: i32,
    /// Set when this failure crossed the lockout threshold.
    pub locked_until: Option<Timestamp>,
}

pub struct UserRepo;

impl UserRepo {
    /// Insert a user with the named role.
    ///
    /// Fails with a NOT NULL violation if the role does not exist, and with
    /// `uq_users_email` if the email is taken.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "WITH u AS (
                 INSERT INTO users (username, email, password_hash, role_id)
                 VALUES ($1, $2, $3, (SELECT id FROM roles WHERE name = $4))
                 RETURNING *
             )
             SELECT {USER_COLUMNS} FROM u JOIN roles r ON r.id = u.role_id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = $1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Emails are stored lower-cased; pass a normalized address.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.email = $1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Count a failed password attempt and, once the count reaches
    /// `lock_after`, lock the account for `lock_minutes`.
    ///
    /// Done in one statement so concurrent attempts cannot both read the
    /// same count and skip the lock.
    pub async fn record_failed_login(
        pool: &PgPool,
        id: DbId,
        lock_after: i32,
        lock_minutes: i32,
    ) -> Result<FailedLogin, sqlx::Error> {
        let (failed_login_count, locked_until): (i32, Option<Timestamp>) = sqlx::query_as(
            "UPDATE users SET
                failed_login_count = failed_login_count + 1,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2 THEN NOW() + make_interval(mins => $3)
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING failed_login_count,
                       CASE WHEN failed_login_count >= $2 THEN locked_until END",
        )
        .bind(id)
        .bind(lock_after)
        .bind(lock_minutes)
        .fetch_one(pool)
        .await?;

        Ok(FailedLogin {
            failed_login_count,
            locked_until,
        })
    }

    /// Clear the failure counter and lock, and stamp `last_login_at`.
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

    /// Give the account registered under `email` the named role.
    ///
    /// Returns `false` when no such account (or role) exists, or the account
    /// already holds the role.
    pub async fn grant_role(pool: &PgPool, email: &str, role: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users u SET role_id = r.id
             FROM roles r
             WHERE u.email = $1 AND r.name = $2 AND u.role_id <> r.id",
        )
        .bind(email)
        .bind(role)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
