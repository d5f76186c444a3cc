//! Handlers for the simulated labs (`/labs`).
//!
//! Each user holds at most one live session per lab in the
//! [`LabStore`](crate::store::LabStore). Completing a lab records a
//! `lab_progress` row; a completion whose save failed is retried on the
//! session's next request. Every command sent to a defense lab is written
//! to `defense_logs` after any progress is saved.

use axum::extract::{Path, State};
use axum::Json;
use cybersim_core::labs::{self, LabCategory, LabInfo, LabKind, LabSession, LabSnapshot};
use cybersim_core::types::DbId;
use cybersim_db::models::lab_progress::RecordCompletion;
use cybersim_db::repositories::{DefenseLogRepo, LabProgressRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct FlagRequest {
    pub flag: String,
}

#[derive(Debug, Serialize)]
pub struct InputResponse {
    pub output: Vec<String>,
    pub just_completed: bool,
    pub session: LabSnapshot,
}

#[derive(Debug, Serialize)]
pub struct FlagResponse {
    pub accepted: bool,
    pub just_completed: bool,
    pub session: LabSnapshot,
}

/// GET /api/labs
pub async fn list_labs() -> Json<DataResponse<Vec<LabInfo>>> {
    Json(DataResponse {
        data: labs::catalog(),
    })
}

/// GET /api/labs/{slug}
pub async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<LabSnapshot>>> {
    let kind = LabKind::from_slug(&slug)?;
    let snapshot = state.labs.snapshot(auth.user_id, kind).await;
    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /api/labs/{slug}/start
///
/// Starting a lab that is already running leaves it untouched.
pub async fn start_lab(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<LabSnapshot>>> {
    let kind = LabKind::from_slug(&slug)?;
    let snapshot = state
        .labs
        .with_session(auth.user_id, kind, |session| {
            session.start();
            session.snapshot()
        })
        .await;

    tracing::info!(user_id = auth.user_id, slug = kind.slug(), "Lab started");
    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /api/labs/{slug}/input
pub async fn submit_input(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(req): Json<InputRequest>,
) -> AppResult<Json<DataResponse<InputResponse>>> {
    let kind = LabKind::from_slug(&slug)?;
    let (outcome, snapshot, unrecorded) = state
        .labs
        .with_session(auth.user_id, kind, |session| {
            session
                .input(&req.input)
                .map(|o| (o, session.snapshot(), session.unrecorded_completion()))
        })
        .await?;

    if let Some(score) = unrecorded {
        persist_completion(&state, auth.user_id, kind, score).await?;
    }
    if kind.category() == LabCategory::Defense {
        DefenseLogRepo::create(&state.pool, auth.user_id, kind.slug(), req.input.trim()).await?;
    }

    Ok(Json(DataResponse {
        data: InputResponse {
            output: outcome.output,
            just_completed: outcome.just_completed,
            session: snapshot,
        },
    }))
}

/// POST /api/labs/{slug}/flag
///
/// Only an exact match of the lab's flag is accepted.
pub async fn submit_flag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(req): Json<FlagRequest>,
) -> AppResult<Json<DataResponse<FlagResponse>>> {
    let kind = LabKind::from_slug(&slug)?;
    let (outcome, snapshot, unrecorded) = state
        .labs
        .with_session(auth.user_id, kind, |session| {
            session
                .submit_flag(&req.flag)
                .map(|o| (o, session.snapshot(), session.unrecorded_completion()))
        })
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        slug = kind.slug(),
        accepted = outcome.accepted,
        "Flag submitted",
    );

    if let Some(score) = unrecorded {
        persist_completion(&state, auth.user_id, kind, score).await?;
    }

    Ok(Json(DataResponse {
        data: FlagResponse {
            accepted: outcome.accepted,
            just_completed: outcome.just_completed,
            session: snapshot,
        },
    }))
}

/// POST /api/labs/{slug}/reset
///
/// Discards the live session. Recorded progress is kept.
pub async fn reset_lab(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<LabSnapshot>>> {
    let kind = LabKind::from_slug(&slug)?;
    let snapshot = state
        .labs
        .with_session(auth.user_id, kind, |session| {
            session.reset();
            session.snapshot()
        })
        .await;

    tracing::info!(user_id = auth.user_id, slug = kind.slug(), "Lab reset");
    Ok(Json(DataResponse { data: snapshot }))
}

async fn persist_completion(
    state: &AppState,
    user_id: DbId,
    kind: LabKind,
    score: u32,
) -> AppResult<()> {
    let row = LabProgressRepo::record(
        &state.pool,
        user_id,
        &RecordCompletion {
            lab_slug: kind.slug().to_string(),
            category: kind.category().as_str().to_string(),
            score: score as i32,
        },
    )
    .await?;

    state
        .labs
        .with_session(user_id, kind, LabSession::mark_completion_recorded)
        .await;

    tracing::info!(
        user_id,
        slug = kind.slug(),
        score = row.score,
        "Lab completed",
    );
    Ok(())
}
