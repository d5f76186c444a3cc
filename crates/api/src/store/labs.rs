use std::collections::HashMap;

use cybersim_core::labs::{LabCategory, LabKind, LabSession, LabSnapshot};
use cybersim_core::types::DbId;
use tokio::sync::RwLock;

/// Live lab sessions, one per (user, lab).
#[derive(Debug, Default)]
pub struct LabStore {
    sessions: RwLock<HashMap<(DbId, LabKind), LabSession>>,
}

impl LabStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the user's session for `kind`, creating a fresh one
    /// if none exists. The store is locked for the duration of `f`.
    pub async fn with_session<R>(
        &self,
        user_id: DbId,
        kind: LabKind,
        f: impl FnOnce(&mut LabSession) -> R,
    ) -> R {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry((user_id, kind))
            .or_insert_with(|| LabSession::new(kind));
        f(session)
    }

    /// Current state of the user's session. Users without a session see the
    /// unstarted lab.
    pub async fn snapshot(&self, user_id: DbId, kind: LabKind) -> LabSnapshot {
        match self.sessions.read().await.get(&(user_id, kind)) {
            Some(session) => session.snapshot(),
            None => LabSession::new(kind).snapshot(),
        }
    }

    /// Discard every session the user holds in `category`. Returns how many
    /// were removed.
    pub async fn discard_category(&self, user_id: DbId, category: LabCategory) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|(owner, kind), _| !(*owner == user_id && kind.category() == category));
        before - sessions.len()
    }
}
