//! Outgoing email for support tickets.
//!
//! [`SmtpMailer`] delivers through an SMTP relay. [`LogMailer`] is used when
//! no relay is configured: it logs each message and keeps it in memory so
//! the API stays usable in development and tests.

pub mod mailer;
pub mod templates;

pub use mailer::{LogMailer, MailError, Mailer, OutgoingEmail, SmtpConfig, SmtpMailer};
