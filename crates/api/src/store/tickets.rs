use std::collections::HashMap;

use chrono::{Datelike, Utc};
use cybersim_core::support::{
    format_ticket_number, Priority, TicketStatus, FIRST_TICKET_SEQ, SUPPORT_TEAM_NAME,
};
use cybersim_core::types::{DbId, Timestamp};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A staff reply recorded on a ticket.
#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub id: Uuid,
    pub response: String,
    pub responded_at: Timestamp,
    pub responded_by: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub ticket_number: String,
    #[serde(skip)]
    seq: u32,
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub category: String,
    pub message: String,
    pub priority: Priority,
    pub attachment_info: Option<String>,
    pub user_agent: Option<String>,
    pub status: TicketStatus,
    pub created_at: Timestamp,
    pub closed_at: Option<Timestamp>,
    pub responses: Vec<TicketResponse>,
}

/// Validated fields for a new ticket.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub category: String,
    pub message: String,
    pub priority: Priority,
    pub attachment_info: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
struct Inner {
    tickets: HashMap<String, Ticket>,
    next_seq: u32,
}

/// Support tickets keyed by ticket number.
///
/// The sequence counter lives under the same lock as the map, so numbers
/// are unique and issued in creation order.
#[derive(Debug)]
pub struct TicketStore {
    inner: RwLock<Inner>,
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tickets: HashMap::new(),
                next_seq: FIRST_TICKET_SEQ,
            }),
        }
    }

    /// Store a new open ticket and return it.
    pub async fn create(&self, input: NewTicket) -> Ticket {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let ticket = Ticket {
            ticket_number: format_ticket_number(now.year(), seq),
            seq,
            user_id: input.user_id,
            name: input.name,
            email: input.email,
            subject: input.subject,
            category: input.category,
            message: input.message,
            priority: input.priority,
            attachment_info: input.attachment_info,
            user_agent: input.user_agent,
            status: TicketStatus::Open,
            created_at: now,
            closed_at: None,
            responses: Vec::new(),
        };
        inner
            .tickets
            .insert(ticket.ticket_number.clone(), ticket.clone());
        ticket
    }

    pub async fn get(&self, ticket_number: &str) -> Option<Ticket> {
        self.inner.read().await.tickets.get(ticket_number).cloned()
    }

    /// A user's tickets, newest first.
    pub async fn list_for_user(&self, user_id: DbId) -> Vec<Ticket> {
        let inner = self.inner.read().await;
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.seq.cmp(&a.seq));
        tickets
    }

    /// Append a staff response and optionally move the ticket to `status`.
    /// Returns the updated ticket, or `None` if it does not exist.
    pub async fn add_response(
        &self,
        ticket_number: &str,
        response: String,
        status: Option<TicketStatus>,
    ) -> Option<Ticket> {
        let mut inner = self.inner.write().await;
        let ticket = inner.tickets.get_mut(ticket_number)?;
        let now = Utc::now();
        ticket.responses.push(TicketResponse {
            id: Uuid::new_v4(),
            response,
            responded_at: now,
            responded_by: SUPPORT_TEAM_NAME,
        });
        if let Some(status) = status {
            set_status(ticket, status, now);
        }
        Some(ticket.clone())
    }

    /// Mark a ticket closed. Returns the updated ticket, or `None` if it
    /// does not exist.
    pub async fn close(&self, ticket_number: &str) -> Option<Ticket> {
        let mut inner = self.inner.write().await;
        let ticket = inner.tickets.get_mut(ticket_number)?;
        set_status(ticket, TicketStatus::Closed, Utc::now());
        Some(ticket.clone())
    }
}

fn set_status(ticket: &mut Ticket, status: TicketStatus, now: Timestamp) {
    ticket.status = status;
    ticket.closed_at = match status {
        TicketStatus::Closed => ticket.closed_at.or(Some(now)),
        _ => None,
    };
}
