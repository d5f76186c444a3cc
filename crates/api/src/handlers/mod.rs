pub mod ai;
pub mod articles;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod defense;
pub mod email;
pub mod labs;
