use cybersim_core::roles::{ROLE_ADMIN, ROLE_USER};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Inbox that receives new-ticket notifications.
    pub support_email: String,
    /// Sender address on all outgoing email.
    pub email_from: String,
    /// Lower-cased addresses that hold the admin role, from `ADMIN_EMAILS`.
    pub admin_emails: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                   |
    /// |-------------------------|---------------------------|
    /// | `HOST`                  | `0.0.0.0`                 |
    /// | `PORT`                  | `5000`                    |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                      |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                      |
    /// | `SUPPORT_EMAIL`         | `support@cybersim.com`    |
    /// | `EMAIL_FROM`            | `noreply@cybersim.com`    |
    /// | `ADMIN_EMAILS`          | (none)                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let support_email =
            std::env::var("SUPPORT_EMAIL").unwrap_or_else(|_| "support@cybersim.com".into());
        let email_from =
            std::env::var("EMAIL_FROM").unwrap_or_else(|_| "noreply@cybersim.com".into());

        let admin_emails = parse_admin_emails(&std::env::var("ADMIN_EMAILS").unwrap_or_default());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            support_email,
            email_from,
            admin_emails,
        }
    }

    /// Role given to an account registering with `email` (already
    /// lower-cased).
    pub fn role_for_email(&self, email: &str) -> &'static str {
        if self.admin_emails.iter().any(|admin| admin == email) {
            ROLE_ADMIN
        } else {
            ROLE_USER
        }
    }
}

fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
