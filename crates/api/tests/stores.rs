//! Unit tests for the in-memory chat, ticket and lab stores.

use assert_matches::assert_matches;
use cybersim_api::store::{ChatMessage, ChatStore, LabStore, NewTicket, Sender, TicketStore};
use cybersim_core::labs::{LabCategory, LabKind};
use cybersim_core::support::{Priority, TicketStatus};

fn new_ticket(user_id: i64, subject: &str) -> NewTicket {
    NewTicket {
        user_id,
        name: "Ada".into(),
        email: "ada@test.com".into(),
        subject: subject.into(),
        category: "labs".into(),
        message: "The XSS lab will not start".into(),
        priority: Priority::High,
        attachment_info: None,
        user_agent: None,
    }
}

// ---------------------------------------------------------------------------
// ChatStore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chat_unknown_session_is_empty() {
    let store = ChatStore::new();

    assert!(store.messages("nope").await.is_empty());
    assert_eq!(store.session_count().await, 0);
}

#[tokio::test]
async fn chat_append_keeps_order_per_session() {
    let store = ChatStore::new();
    store
        .append(
            "s1",
            [ChatMessage::from_user(7, "hello"), ChatMessage::from_agent("hi")],
        )
        .await;
    store.append("s2", [ChatMessage::from_user(8, "other")]).await;

    let messages = store.messages("s1").await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].user_id, Some(7));
    assert_eq!(messages[1].sender, Sender::Agent);
    assert!(messages[1].agent_name.is_some());
    assert_eq!(store.session_count().await, 2);
}

#[tokio::test]
async fn chat_clear_reports_existence() {
    let store = ChatStore::new();
    store.append("s1", [ChatMessage::from_user(1, "x")]).await;

    assert!(store.clear("s1").await);
    assert!(!store.clear("s1").await);
    assert!(store.messages("s1").await.is_empty());
}

// ---------------------------------------------------------------------------
// TicketStore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tickets_are_numbered_from_1001() {
    let store = TicketStore::new();

    let first = store.create(new_ticket(1, "first")).await;
    let second = store.create(new_ticket(1, "second")).await;

    assert!(first.ticket_number.starts_with("CSE-"));
    assert!(first.ticket_number.ends_with("-1001"));
    assert!(second.ticket_number.ends_with("-1002"));
    assert_eq!(first.status, TicketStatus::Open);
    assert!(first.closed_at.is_none());
}

#[tokio::test]
async fn tickets_listed_newest_first_per_user() {
    let store = TicketStore::new();
    store.create(new_ticket(1, "a")).await;
    store.create(new_ticket(2, "b")).await;
    store.create(new_ticket(1, "c")).await;

    let subjects: Vec<_> = store
        .list_for_user(1)
        .await
        .into_iter()
        .map(|t| t.subject)
        .collect();
    assert_eq!(subjects, ["c", "a"]);
}

#[tokio::test]
async fn response_with_status_updates_ticket() {
    let store = TicketStore::new();
    let ticket = store.create(new_ticket(1, "a")).await;

    let updated = store
        .add_response(&ticket.ticket_number, "Fixed".into(), Some(TicketStatus::Closed))
        .await
        .unwrap();
    assert_eq!(updated.responses.len(), 1);
    assert_eq!(updated.responses[0].responded_by, "Support Team");
    assert_eq!(updated.status, TicketStatus::Closed);
    assert!(updated.closed_at.is_some());

    let reopened = store
        .add_response(&ticket.ticket_number, "Reopening".into(), Some(TicketStatus::Open))
        .await
        .unwrap();
    assert_eq!(reopened.responses.len(), 2);
    assert!(reopened.closed_at.is_none());
}

#[tokio::test]
async fn close_and_missing_tickets() {
    let store = TicketStore::new();
    let ticket = store.create(new_ticket(1, "a")).await;

    let closed = store.close(&ticket.ticket_number).await.unwrap();
    assert_eq!(closed.status, TicketStatus::Closed);
    assert!(closed.closed_at.is_some());

    assert_matches!(store.get(&ticket.ticket_number).await, Some(t) if t.status == TicketStatus::Closed);
    assert!(store.close("CSE-1999-1").await.is_none());
    assert!(store.get("CSE-1999-1").await.is_none());
    assert!(store
        .add_response("CSE-1999-1", "x".into(), None)
        .await
        .is_none());
}

// ---------------------------------------------------------------------------
// LabStore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lab_snapshot_defaults_to_unstarted() {
    let store = LabStore::new();

    let snapshot = store.snapshot(1, LabKind::Xss).await;
    assert!(!snapshot.core.started);
    assert_eq!(snapshot.slug, "xss");
}

#[tokio::test]
async fn lab_sessions_persist_between_calls() {
    let store = LabStore::new();

    store.with_session(1, LabKind::Xss, |s| s.start()).await;
    let started = store.with_session(1, LabKind::Xss, |s| s.core().started).await;
    assert!(started);
    assert!(!store.snapshot(2, LabKind::Xss).await.core.started);
}

#[tokio::test]
async fn discard_category_leaves_other_labs() {
    let store = LabStore::new();
    for kind in [
        LabKind::Xss,
        LabKind::NetworkSecurity,
        LabKind::IncidentResponse,
    ] {
        store.with_session(1, kind, |s| s.start()).await;
    }
    store
        .with_session(2, LabKind::NetworkSecurity, |s| s.start())
        .await;

    assert_eq!(store.discard_category(1, LabCategory::Defense).await, 2);
    assert!(store.snapshot(1, LabKind::Xss).await.core.started);
    assert!(!store.snapshot(1, LabKind::NetworkSecurity).await.core.started);
    assert!(store.snapshot(2, LabKind::NetworkSecurity).await.core.started);
}
