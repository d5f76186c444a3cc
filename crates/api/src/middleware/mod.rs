//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`auth::AdminUser`] -- an `AuthUser` with the `admin` role.
//! - [`client::ClientInfo`] -- user agent and address stored on sessions.

pub mod auth;
pub mod client;
