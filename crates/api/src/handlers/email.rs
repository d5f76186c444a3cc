//! Handlers for support tickets (`/email`).
//!
//! Tickets live in the in-memory [`TicketStore`](crate::store::TicketStore).
//! Email delivery failures are logged and never fail the request.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cybersim_core::error::CoreError;
use cybersim_core::support::{
    validate_ticket_category, validate_ticket_request, Priority, TicketStatus,
    DEFAULT_TICKET_CATEGORY,
};
use cybersim_mail::templates::{self, Rendered, TicketSummary};
use cybersim_mail::OutgoingEmail;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AdminUser, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::store::{NewTicket, Ticket};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SendTicketRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(alias = "attachmentInfo")]
    pub attachment_info: Option<String>,
    #[serde(alias = "userAgent")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketCreated {
    pub ticket_number: String,
    pub status: TicketStatus,
    /// Expected time to first response for the ticket's priority.
    pub estimated_response: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: String,
    pub status: Option<TicketStatus>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/email/send
///
/// Create a ticket, notify the support inbox and confirm to the customer.
pub async fn send_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SendTicketRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TicketCreated>>)> {
    validate_ticket_request(&input.name, &input.email, &input.subject, &input.message)?;
    let category = input
        .category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_TICKET_CATEGORY.to_string());
    validate_ticket_category(&category)?;

    let ticket = state
        .tickets
        .create(NewTicket {
            user_id: auth.user_id,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            subject: input.subject.trim().to_string(),
            category,
            message: input.message,
            priority: input.priority,
            attachment_info: input.attachment_info,
            user_agent: input.user_agent,
        })
        .await;

    tracing::info!(
        user_id = auth.user_id,
        ticket_number = %ticket.ticket_number,
        priority = ticket.priority.as_str(),
        "Support ticket created",
    );

    let summary = ticket_summary(&ticket);
    let notification = templates::support_notification(&summary);
    deliver(
        &state,
        &ticket.ticket_number,
        &state.config.support_email,
        Some(ticket.email.clone()),
        notification,
    )
    .await;

    let confirmation = templates::customer_confirmation(&summary, &state.config.support_email);
    deliver(
        &state,
        &ticket.ticket_number,
        &ticket.email,
        None,
        confirmation,
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TicketCreated {
                ticket_number: ticket.ticket_number,
                status: ticket.status,
                estimated_response: ticket.priority.response_time(),
            },
        }),
    ))
}

/// GET /api/email/tickets
///
/// The caller's tickets, newest first.
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let tickets = state.tickets.list_for_user(auth.user_id).await;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/email/ticket/{ticket_number}
pub async fn get_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ticket_number): Path<String>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = find_ticket(&state, ticket_number).await?;
    auth.ensure_self_or_admin(ticket.user_id)?;
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/email/ticket/{ticket_number}/response
///
/// Admin only. Appends a staff response, optionally changes the status and
/// emails the customer.
pub async fn add_response(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(ticket_number): Path<String>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    if input.response.trim().is_empty() {
        return Err(AppError::BadRequest("Response is required".into()));
    }

    let ticket = state
        .tickets
        .add_response(&ticket_number, input.response.clone(), input.status)
        .await
        .ok_or_else(|| ticket_not_found(ticket_number))?;

    tracing::info!(
        user_id = admin.user_id,
        ticket_number = %ticket.ticket_number,
        status = ticket.status.as_str(),
        "Ticket response added",
    );

    let email = templates::response_email(
        &ticket.ticket_number,
        &ticket.name,
        &ticket.subject,
        &input.response,
    );
    deliver(&state, &ticket.ticket_number, &ticket.email, None, email).await;

    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/email/ticket/{ticket_number}/close
///
/// Only the ticket's owner may close it.
pub async fn close_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ticket_number): Path<String>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = find_ticket(&state, ticket_number).await?;
    if ticket.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden("Access denied".into())));
    }

    let ticket = state
        .tickets
        .close(&ticket.ticket_number)
        .await
        .ok_or_else(|| ticket_not_found(ticket.ticket_number))?;

    tracing::info!(
        user_id = auth.user_id,
        ticket_number = %ticket.ticket_number,
        "Ticket closed",
    );

    Ok(Json(DataResponse { data: ticket }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ticket_not_found(ticket_number: String) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Ticket",
        key: ticket_number,
    })
}

async fn find_ticket(state: &AppState, ticket_number: String) -> AppResult<Ticket> {
    state
        .tickets
        .get(&ticket_number)
        .await
        .ok_or_else(|| ticket_not_found(ticket_number))
}

fn ticket_summary(ticket: &Ticket) -> TicketSummary<'_> {
    TicketSummary {
        ticket_number: &ticket.ticket_number,
        user_id: ticket.user_id,
        name: &ticket.name,
        email: &ticket.email,
        subject: &ticket.subject,
        category: &ticket.category,
        message: &ticket.message,
        priority: ticket.priority,
        attachment_info: ticket.attachment_info.as_deref(),
        user_agent: ticket.user_agent.as_deref(),
        received_at: ticket.created_at,
    }
}

/// Send one rendered email, logging the outcome.
async fn deliver(
    state: &AppState,
    ticket_number: &str,
    to: &str,
    reply_to: Option<String>,
    rendered: Rendered,
) {
    let email = OutgoingEmail {
        from: state.config.email_from.clone(),
        to: to.to_string(),
        reply_to,
        subject: rendered.subject,
        html: rendered.html,
    };

    match state.mailer.send(&email).await {
        Ok(()) => tracing::debug!(
            ticket_number,
            to,
            mailer = state.mailer.kind(),
            "Ticket email sent",
        ),
        Err(err) => tracing::error!(
            ticket_number,
            to,
            error = %err,
            "Failed to send ticket email",
        ),
    }
}
