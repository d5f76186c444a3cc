//! Repository for the `lab_progress` table.

use cybersim_core::types::DbId;
use sqlx::PgPool;

use crate::models::lab_progress::{LabProgress, ProgressSummary, RecordCompletion};

const COLUMNS: &str =
    "id, user_id, lab_slug, category, score, completed_at, created_at, updated_at";

pub struct LabProgressRepo;

impl LabProgressRepo {
    /// Record a completion. Repeating a lab keeps the higher score and moves
    /// `completed_at` to now.
    pub async fn record(
        pool: &PgPool,
        user_id: DbId,
        input: &RecordCompletion,
    ) -> Result<LabProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO lab_progress (user_id, lab_slug, category, score)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_lab_progress_user_lab DO UPDATE SET
                score = GREATEST(lab_progress.score, EXCLUDED.score),
                completed_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LabProgress>(&query)
            .bind(user_id)
            .bind(&input.lab_slug)
            .bind(&input.category)
            .bind(input.score)
            .fetch_one(pool)
            .await
    }

    /// All completions for a user, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<LabProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lab_progress
             WHERE user_id = $1
             ORDER BY completed_at DESC, id DESC"
        );
        sqlx::query_as::<_, LabProgress>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The `limit` most recent completions for a user.
    pub async fn recent_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<LabProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lab_progress
             WHERE user_id = $1
             ORDER BY completed_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, LabProgress>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Completions for a user in one category.
    pub async fn list_for_user_category(
        pool: &PgPool,
        user_id: DbId,
        category: &str,
    ) -> Result<Vec<LabProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lab_progress
             WHERE user_id = $1 AND category = $2
             ORDER BY completed_at DESC, id DESC"
        );
        sqlx::query_as::<_, LabProgress>(&query)
            .bind(user_id)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Completion counts and total score for a user.
    pub async fn summary(pool: &PgPool, user_id: DbId) -> Result<ProgressSummary, sqlx::Error> {
        sqlx::query_as::<_, ProgressSummary>(
            "SELECT
                COUNT(*) AS completed_labs,
                COUNT(*) FILTER (WHERE category = 'attack') AS attack_labs_completed,
                COUNT(*) FILTER (WHERE category = 'defense') AS defense_labs_completed,
                COALESCE(SUM(score), 0)::BIGINT AS total_score
             FROM lab_progress
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a user's completions in one category. Returns the row count.
    pub async fn delete_for_user_category(
        pool: &PgPool,
        user_id: DbId,
        category: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lab_progress WHERE user_id = $1 AND category = $2")
            .bind(user_id)
            .bind(category)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
