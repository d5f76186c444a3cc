//! HTML bodies and subject lines for support-ticket email.
//!
//! Every user-provided value is passed through [`escape_html`] before it is
//! interpolated.

use chrono::{DateTime, Utc};
use cybersim_core::support::Priority;

/// Sign-off used in customer-facing email.
const SIGNATURE: &str = "CyberSim Elite Support Team";

/// A rendered subject and HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub subject: String,
    pub html: String,
}

/// The ticket fields the notification and confirmation templates show.
#[derive(Debug, Clone)]
pub struct TicketSummary<'a> {
    pub ticket_number: &'a str,
    pub user_id: i64,
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub category: &'a str,
    pub message: &'a str,
    pub priority: Priority,
    pub attachment_info: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub received_at: DateTime<Utc>,
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn section(title: &str, body: &str) -> String {
    format!(
        r#"<div style="margin: 20px 0;">
  <h3 style="color: #333; margin-bottom: 10px;">{title}</h3>
  <p style="background: #f9f9f9; padding: 10px; border-left: 3px solid #00d4ff; white-space: pre-wrap;">{body}</p>
</div>"#
    )
}

fn wrap(inner: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; background: #f5f5f5; padding: 20px;">
<div style="max-width: 600px; background: white; padding: 20px; border-radius: 8px;">
{inner}
</div>
</div>"#
    )
}

/// Notification sent to the support inbox when a ticket is opened.
pub fn support_notification(ticket: &TicketSummary<'_>) -> Rendered {
    let number = escape_html(ticket.ticket_number);
    let priority = ticket.priority.as_str().to_uppercase();

    let mut body = format!(
        r#"<h2 style="color: #0f3460; border-bottom: 2px solid #00d4ff; padding-bottom: 10px;">New Support Ticket: {number}</h2>
<div style="margin: 20px 0;">
  <h3 style="color: #333; margin-bottom: 10px;">Ticket Details</h3>
  <p><strong>Ticket Number:</strong> {number}</p>
  <p><strong>Priority:</strong> {priority}</p>
  <p><strong>Category:</strong> {category}</p>
  <p><strong>Received:</strong> {received}</p>
</div>
<div style="margin: 20px 0;">
  <h3 style="color: #333; margin-bottom: 10px;">Customer Information</h3>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>User ID:</strong> {user_id}</p>
</div>
"#,
        category = escape_html(ticket.category),
        received = ticket.received_at.format("%Y-%m-%d %H:%M:%S UTC"),
        name = escape_html(ticket.name),
        email = escape_html(ticket.email),
        user_id = ticket.user_id,
    );
    body.push_str(&section("Subject", &escape_html(ticket.subject)));
    body.push_str(&section("Message", &escape_html(ticket.message)));
    if let Some(info) = ticket.attachment_info.filter(|i| !i.trim().is_empty()) {
        body.push_str(&section("Additional Information", &escape_html(info)));
    }
    body.push_str(&format!(
        r#"
<div style="margin: 20px 0; padding: 10px; background: #f0f0f0; border-radius: 4px; font-size: 12px; color: #666;">
  <p><strong>User Agent:</strong> {}</p>
</div>
<p style="color: #666; font-size: 12px;">This email was sent through the CyberSim Elite support system.</p>"#,
        escape_html(ticket.user_agent.unwrap_or("unknown"))
    ));

    Rendered {
        subject: format!("[{priority}] {} - {}", ticket.ticket_number, ticket.subject),
        html: wrap(&body),
    }
}

/// Confirmation sent to the customer when their ticket is opened.
pub fn customer_confirmation(ticket: &TicketSummary<'_>, support_email: &str) -> Rendered {
    let number = escape_html(ticket.ticket_number);
    let body = format!(
        r#"<h2 style="color: #0f3460;">Support Ticket Received</h2>
<p>Hello {name},</p>
<p>Thank you for contacting CyberSim Elite Support! We've received your email and created a support ticket for you.</p>
<div style="background: #00d4ff; color: white; padding: 15px; border-radius: 6px; margin: 20px 0; text-align: center;">
  <h3 style="margin: 0 0 5px;">Your Ticket Number</h3>
  <p style="margin: 0; font-size: 24px; font-weight: bold;">{number}</p>
</div>
<p>Please save this ticket number for your reference. You can use it to track your support request.</p>
<div style="margin: 20px 0; padding: 15px; background: #f9f9f9; border-left: 3px solid #00d4ff;">
  <h4 style="margin: 0 0 10px; color: #333;">Expected Response Time</h4>
  <p style="margin: 0; color: #666;">{response_time}</p>
</div>
<h4 style="color: #333; margin-top: 20px;">Your Request Details</h4>
<ul style="color: #666;">
  <li><strong>Category:</strong> {category}</li>
  <li><strong>Subject:</strong> {subject}</li>
  <li><strong>Priority:</strong> {priority}</li>
</ul>
<h4 style="color: #333;">Next Steps</h4>
<ol style="color: #666;">
  <li>Our support team will review your request</li>
  <li>You'll receive an email response with a solution or next steps</li>
  <li>If we need more information, we'll contact you directly</li>
</ol>
<p style="font-size: 12px; color: #666;"><strong>Note:</strong> Please don't reply to this email. For follow-ups, mention your ticket number in a new support request.</p>
<div style="margin-top: 30px; text-align: center; color: #999; font-size: 12px;">
  <p>{SIGNATURE}</p>
  <p>{support}</p>
</div>"#,
        name = escape_html(ticket.name),
        response_time = ticket.priority.response_time_label(),
        category = escape_html(ticket.category),
        subject = escape_html(ticket.subject),
        priority = ticket.priority.as_str(),
        support = escape_html(support_email),
    );

    Rendered {
        subject: format!("Support Ticket Created: {}", ticket.ticket_number),
        html: wrap(&body),
    }
}

/// Email sent to the customer when staff add a response to their ticket.
pub fn response_email(
    ticket_number: &str,
    customer_name: &str,
    ticket_subject: &str,
    response: &str,
) -> Rendered {
    let body = format!(
        r#"<h2 style="color: #0f3460;">Response to Your Support Ticket</h2>
<p>Hello {name},</p>
<p>Our support team has responded to your ticket <strong>{number}</strong>:</p>
<div style="margin: 20px 0; padding: 15px; background: #f9f9f9; border-left: 3px solid #00d4ff;">
  <p style="margin: 0; white-space: pre-wrap; color: #333;">{response}</p>
</div>
<p style="color: #666; margin-top: 20px;">If you have follow-up questions, please create a new support request mentioning this ticket number.</p>
<div style="margin-top: 30px; text-align: center; color: #999; font-size: 12px;">
  <p>{SIGNATURE}</p>
</div>"#,
        name = escape_html(customer_name),
        number = escape_html(ticket_number),
        response = escape_html(response),
    );

    Rendered {
        subject: format!("Re: {ticket_number} - {ticket_subject}"),
        html: wrap(&body),
    }
}
