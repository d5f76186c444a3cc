//! Support ticket rules: numbering, priorities, statuses and request
//! validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Sequence number of the first ticket issued by a fresh process.
pub const FIRST_TICKET_SEQ: u32 = 1001;

/// Display name recorded on responses added by staff.
pub const SUPPORT_TEAM_NAME: &str = "Support Team";

pub const MAX_SUBJECT_LEN: usize = 200;
pub const MAX_MESSAGE_LEN: usize = 10_000;

// ---------------------------------------------------------------------------
// Ticket number
// ---------------------------------------------------------------------------

/// Format a ticket number as `CSE-{year}-{seq}`.
pub fn format_ticket_number(year: i32, seq: u32) -> String {
    format!("CSE-{year}-{seq}")
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub const CATEGORY_TECHNICAL: &str = "technical";
pub const CATEGORY_ACCOUNT: &str = "account";
pub const CATEGORY_LABS: &str = "labs";
pub const CATEGORY_FEATURE: &str = "feature";
pub const CATEGORY_FEEDBACK: &str = "feedback";
pub const CATEGORY_OTHER: &str = "other";

pub const VALID_TICKET_CATEGORIES: &[&str] = &[
    CATEGORY_TECHNICAL,
    CATEGORY_ACCOUNT,
    CATEGORY_LABS,
    CATEGORY_FEATURE,
    CATEGORY_FEEDBACK,
    CATEGORY_OTHER,
];

pub const DEFAULT_TICKET_CATEGORY: &str = CATEGORY_TECHNICAL;

pub fn validate_ticket_category(category: &str) -> Result<(), CoreError> {
    if !VALID_TICKET_CATEGORIES.contains(&category) {
        return Err(CoreError::Validation(format!(
            "Invalid category '{}'. Valid categories: {}",
            category,
            VALID_TICKET_CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Expected time to first response.
    pub fn response_time(self) -> &'static str {
        match self {
            Priority::Urgent => "2-4 hours",
            Priority::High => "4-8 hours",
            Priority::Normal => "24 hours",
            Priority::Low => "2-3 days",
        }
    }

    /// Response time with its service-level label, for customer emails.
    pub fn response_time_label(self) -> &'static str {
        match self {
            Priority::Urgent => "⚠️ 2-4 hours (Urgent Priority)",
            Priority::High => "🟠 4-8 hours (High Priority)",
            Priority::Normal => "🔵 24 hours (Standard Support)",
            Priority::Low => "🟢 2-3 days (Low Priority)",
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !EMAIL_RE.is_match(email) {
        return Err(CoreError::Validation("Invalid email address".into()));
    }
    Ok(())
}

/// Check the fields every ticket must carry. Missing fields are reported
/// before the email format.
pub fn validate_ticket_request(
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> Result<(), CoreError> {
    let missing: Vec<&str> = [
        ("name", name),
        ("email", email),
        ("subject", subject),
        ("message", message),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    validate_email(email)?;

    if subject.len() > MAX_SUBJECT_LEN {
        return Err(CoreError::Validation(format!(
            "Subject must be at most {MAX_SUBJECT_LEN} characters"
        )));
    }
    if message.len() > MAX_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "Message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
