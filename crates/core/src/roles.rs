//! Well-known role names.
//!
//! These must match the seed rows in `20260301000002_create_users.sql`.
//! Users reference roles by name; the numeric ids stay inside the database.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
