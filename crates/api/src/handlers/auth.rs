//! Handlers for the `/auth` resource (register, login, refresh, logout,
//! profile, progress).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use cybersim_core::error::CoreError;
use cybersim_core::labs::LabKind;
use cybersim_core::progress::validate_score;
use cybersim_core::support::validate_email;
use cybersim_db::models::lab_progress::{LabProgress, ProgressSummary, RecordCompletion};
use cybersim_db::models::session::CreateSession;
use cybersim_db::models::user::{CreateUser, User, UserResponse};
use cybersim_db::repositories::{LabProgressRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i32 = 15;

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body of `POST /auth/progress`. `score` defaults to the lab's maximum.
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub lab_slug: String,
    pub score: Option<i32>,
}

/// Tokens plus the signed-in user, returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub progress: Vec<LabProgress>,
    pub summary: ProgressSummary,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create a user and sign them in. Addresses listed in `ADMIN_EMAILS` get
/// the admin role, everyone else the user role.
pub async fn register(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_lowercase();

    let name_len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&name_len) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
        ))));
    }
    validate_email(&email)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH).map_err(AppError::BadRequest)?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let role = state.config.role_for_email(&email);
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    let response = create_auth_response(&state, &user, client, None).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let email = input.email.trim().to_lowercase();
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    // 1. Find user by email.
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    // 2. Check if the account is active.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // 3. Check if the account is temporarily locked.
    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    // 4. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failed = UserRepo::record_failed_login(
            &state.pool,
            user.id,
            MAX_FAILED_ATTEMPTS,
            LOCK_DURATION_MINS,
        )
        .await?;
        if let Some(until) = failed.locked_until {
            tracing::warn!(
                user_id = user.id,
                attempts = failed.failed_login_count,
                %until,
                "Account locked after repeated failed logins"
            );
        }
        return Err(invalid());
    }

    // 5. On success: reset failed count, set last_login_at.
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, &user, client, None).await?;

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// session is revoked in the same transaction that stores the new one, so
/// each refresh token can be redeemed once.
pub async fn refresh(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_active(&state.pool, &token_hash)
        .await?
        .ok_or_else(invalid_refresh_token)?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user, client, Some(&token_hash)).await?;

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    let progress = LabProgressRepo::list_for_user(&state.pool, user.id).await?;
    let summary = LabProgressRepo::summary(&state.pool, user.id).await?;

    Ok(Json(DataResponse {
        data: ProfileResponse {
            user: UserResponse::from_user(&user),
            progress,
            summary,
        },
    }))
}

/// POST /api/auth/progress
///
/// Record a lab completion reported by the client.
pub async fn record_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ProgressRequest>,
) -> AppResult<Json<DataResponse<LabProgress>>> {
    let kind = LabKind::from_slug(&input.lab_slug)?;
    let max_score = kind.max_score();
    let score = match input.score {
        Some(score) => {
            validate_score(score, max_score)?;
            score
        }
        None => max_score as i32,
    };

    let row = LabProgressRepo::record(
        &state.pool,
        auth_user.user_id,
        &RecordCompletion {
            lab_slug: kind.slug().to_string(),
            category: kind.category().as_str().to_string(),
            score,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth_user.user_id,
        slug = kind.slug(),
        score = row.score,
        "Lab progress recorded",
    );

    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_refresh_token() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid or expired refresh token".into(),
    ))
}

/// Sign an access token and a fresh refresh token for `user`, and store the
/// refresh session with the caller's user agent and address.
///
/// With `rotating`, the session behind that refresh token hash is replaced;
/// if it was already redeemed the call fails with 401.
async fn create_auth_response(
    state: &AppState,
    user: &User,
    client: ClientInfo,
    rotating: Option<&str>,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let session = CreateSession {
        user_id: user.id,
        refresh_token_hash: refresh_hash,
        expires_at: Utc::now()
            + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days),
        user_agent: client.user_agent,
        ip_address: client.ip_address,
    };

    match rotating {
        None => {
            SessionRepo::create(&state.pool, &session).await?;
        }
        Some(old_hash) => {
            SessionRepo::rotate(&state.pool, old_hash, &session)
                .await?
                .ok_or_else(invalid_refresh_token)?;
        }
    }

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_ttl_secs(),
        user: UserResponse::from_user(user),
    })
}
