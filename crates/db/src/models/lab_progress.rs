//! Lab completion records.

use cybersim_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lab_progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LabProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub lab_slug: String,
    pub category: String,
    pub score: i32,
    pub completed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a completion.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordCompletion {
    pub lab_slug: String,
    pub category: String,
    pub score: i32,
}

/// Aggregate progress for one user.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ProgressSummary {
    pub completed_labs: i64,
    pub attack_labs_completed: i64,
    pub defense_labs_completed: i64,
    pub total_score: i64,
}
