//! Defense lab command log.

use cybersim_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `defense_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DefenseLog {
    pub id: DbId,
    pub user_id: DbId,
    pub lab_slug: String,
    pub command: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
