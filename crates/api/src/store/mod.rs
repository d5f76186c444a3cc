//! Process-local stores for data that is not persisted: support chat
//! sessions, support tickets and live lab sessions.
//!
//! Each store guards its map with a `tokio::sync::RwLock` and is shared
//! through `Arc` in [`AppState`](crate::state::AppState). Contents are lost
//! on restart.

pub mod chat;
pub mod labs;
pub mod tickets;

pub use chat::{ChatMessage, ChatStore, Sender};
pub use labs::LabStore;
pub use tickets::{NewTicket, Ticket, TicketResponse, TicketStore};
