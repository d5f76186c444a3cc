pub mod articles;
pub mod error;
pub mod labs;
pub mod progress;
pub mod responder;
pub mod roles;
pub mod support;
pub mod types;
