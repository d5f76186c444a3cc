//! Startup tasks run once before the server accepts requests.

use cybersim_core::roles::ROLE_ADMIN;
use cybersim_db::repositories::UserRepo;
use sqlx::PgPool;

/// Give the admin role to every already-registered account in `emails`.
///
/// Addresses that register later are handled at sign-up by
/// [`ServerConfig::role_for_email`](crate::config::ServerConfig::role_for_email).
/// Returns how many accounts changed role.
pub async fn grant_configured_admins(pool: &PgPool, emails: &[String]) -> Result<u64, sqlx::Error> {
    let mut granted = 0;
    for email in emails {
        if UserRepo::grant_role(pool, email, ROLE_ADMIN).await? {
            tracing::info!(%email, "Granted admin role");
            granted += 1;
        } else {
            tracing::debug!(%email, "Admin email not registered or already admin");
        }
    }
    Ok(granted)
}
