//! Repository for the `defense_logs` table.

use cybersim_core::types::DbId;
use sqlx::PgPool;

use crate::models::defense_log::DefenseLog;

const COLUMNS: &str = "id, user_id, lab_slug, command, created_at, updated_at";

pub struct DefenseLogRepo;

impl DefenseLogRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        lab_slug: &str,
        command: &str,
    ) -> Result<DefenseLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO defense_logs (user_id, lab_slug, command)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DefenseLog>(&query)
            .bind(user_id)
            .bind(lab_slug)
            .bind(command)
            .fetch_one(pool)
            .await
    }

    /// Number of commands a user has submitted across all defense labs.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM defense_logs WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Most recent commands for a user in one lab, newest first.
    pub async fn list_for_user_lab(
        pool: &PgPool,
        user_id: DbId,
        lab_slug: &str,
        limit: i64,
    ) -> Result<Vec<DefenseLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM defense_logs
             WHERE user_id = $1 AND lab_slug = $2
             ORDER BY created_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, DefenseLog>(&query)
            .bind(user_id)
            .bind(lab_slug)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete every command logged by a user. Returns the row count.
    pub async fn delete_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM defense_logs WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
