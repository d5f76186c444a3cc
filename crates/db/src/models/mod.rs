//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity matching the database row and
//! the `Deserialize` DTOs used to create it.

pub mod article;
pub mod defense_log;
pub mod lab_progress;
pub mod session;
pub mod user;
