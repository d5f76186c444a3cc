//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod article_repo;
pub mod defense_log_repo;
pub mod lab_progress_repo;
pub mod session_repo;
pub mod user_repo;

pub use article_repo::ArticleRepo;
pub use defense_log_repo::DefenseLogRepo;
pub use lab_progress_repo::LabProgressRepo;
pub use session_repo::SessionRepo;
pub use user_repo::{FailedLogin, UserRepo};
