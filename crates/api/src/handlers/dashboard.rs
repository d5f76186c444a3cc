//! Handler for the learner dashboard.

use axum::extract::State;
use axum::Json;
use cybersim_core::labs::{LabCategory, LabKind};
use cybersim_core::progress::{next_rank_threshold, rank_for_score, RECENT_ACTIVITY_LIMIT};
use cybersim_db::models::lab_progress::LabProgress;
use cybersim_db::repositories::LabProgressRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_labs: usize,
    pub total_attack_labs: usize,
    pub total_defense_labs: usize,
    pub completed_labs: i64,
    pub attack_labs_completed: i64,
    pub defense_labs_completed: i64,
    pub total_score: i64,
    pub rank: &'static str,
    /// Score at which the next rank is reached. `None` at the top rank.
    pub next_rank_at: Option<i64>,
    pub recent_activity: Vec<LabProgress>,
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let summary = LabProgressRepo::summary(&state.pool, auth.user_id).await?;
    let recent_activity =
        LabProgressRepo::recent_for_user(&state.pool, auth.user_id, RECENT_ACTIVITY_LIMIT).await?;

    let count_in = |category: LabCategory| {
        LabKind::ALL
            .iter()
            .filter(|k| k.category() == category)
            .count()
    };

    Ok(Json(DataResponse {
        data: DashboardStats {
            total_labs: LabKind::ALL.len(),
            total_attack_labs: count_in(LabCategory::Attack),
            total_defense_labs: count_in(LabCategory::Defense),
            completed_labs: summary.completed_labs,
            attack_labs_completed: summary.attack_labs_completed,
            defense_labs_completed: summary.defense_labs_completed,
            total_score: summary.total_score,
            rank: rank_for_score(summary.total_score),
            next_rank_at: next_rank_threshold(summary.total_score),
            recent_activity,
        },
    }))
}
