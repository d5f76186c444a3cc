//! Handlers for the defense-lab tracker (`/defense`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cybersim_core::labs::{self, LabCategory, LabInfo, LabKind};
use cybersim_core::types::DbId;
use cybersim_db::models::defense_log::DefenseLog;
use cybersim_db::models::lab_progress::LabProgress;
use cybersim_db::repositories::{DefenseLogRepo, LabProgressRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFENSE: &str = LabCategory::Defense.as_str();

#[derive(Debug, Deserialize)]
pub struct LogCommandRequest {
    pub lab: String,
    pub command: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(alias = "userId")]
    pub user_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct DefenseStatus {
    pub user_id: DbId,
    pub completed_labs: Vec<LabProgress>,
    pub total_score: i64,
    pub commands_logged: i64,
}

#[derive(Debug, Serialize)]
pub struct ResetSummary {
    pub user_id: DbId,
    pub progress_removed: u64,
    pub logs_removed: u64,
    pub sessions_discarded: usize,
}

/// GET /api/defense/labs
pub async fn list_labs() -> Json<DataResponse<Vec<LabInfo>>> {
    Json(DataResponse {
        data: labs::catalog_for(LabCategory::Defense),
    })
}

/// POST /api/defense/log
///
/// Record a command the caller ran in a defense lab.
pub async fn log_command(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<LogCommandRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<DefenseLog>>)> {
    let kind = LabKind::from_slug(&input.lab)?;
    if kind.category() != LabCategory::Defense {
        return Err(AppError::BadRequest(format!(
            "'{}' is not a defense lab",
            kind.slug()
        )));
    }
    let command = input.command.trim();
    if command.is_empty() {
        return Err(AppError::BadRequest("Command is required".into()));
    }

    let log = DefenseLogRepo::create(&state.pool, auth.user_id, kind.slug(), command).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: log })))
}

/// GET /api/defense/status/{user_id}
///
/// The user's completed defense labs and logged command count. Visible to
/// the user and to admins.
pub async fn status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<DefenseStatus>>> {
    auth.ensure_self_or_admin(user_id)?;

    let completed_labs =
        LabProgressRepo::list_for_user_category(&state.pool, user_id, DEFENSE).await?;
    let total_score = completed_labs.iter().map(|p| i64::from(p.score)).sum();
    let commands_logged = DefenseLogRepo::count_for_user(&state.pool, user_id).await?;

    Ok(Json(DataResponse {
        data: DefenseStatus {
            user_id,
            completed_labs,
            total_score,
            commands_logged,
        },
    }))
}

/// POST /api/defense/reset
///
/// Clear a user's defense progress, command log and live defense sessions.
pub async fn reset(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ResetRequest>,
) -> AppResult<Json<DataResponse<ResetSummary>>> {
    auth.ensure_self_or_admin(input.user_id)?;

    let progress_removed =
        LabProgressRepo::delete_for_user_category(&state.pool, input.user_id, DEFENSE).await?;
    let logs_removed = DefenseLogRepo::delete_for_user(&state.pool, input.user_id).await?;
    let sessions_discarded = state
        .labs
        .discard_category(input.user_id, LabCategory::Defense)
        .await;

    tracing::info!(
        user_id = auth.user_id,
        target_user_id = input.user_id,
        progress_removed,
        logs_removed,
        sessions_discarded,
        "Defense progress reset",
    );

    Ok(Json(DataResponse {
        data: ResetSummary {
            user_id: input.user_id,
            progress_removed,
            logs_removed,
            sessions_discarded,
        },
    }))
}
