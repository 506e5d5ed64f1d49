use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use shared::{
    domain::{FormState, FormValues},
    protocol::SessionId,
};
use tokio::sync::Mutex;
use tracing::info;

/// One client's form: its shape and the values of its last submission.
#[derive(Debug, Clone)]
pub(crate) struct FormSession {
    pub(crate) state: FormState,
    pub(crate) values: FormValues,
    pub(crate) created_at: DateTime<Utc>,
}

impl FormSession {
    fn new() -> Self {
        Self {
            state: FormState::default(),
            values: FormValues::new(),
            created_at: Utc::now(),
        }
    }
}

/// In-memory sessions keyed by id. The oldest session is evicted once the
/// store is full.
#[derive(Clone)]
pub(crate) struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, FormSession>>>,
    max_sessions: usize,
}

impl SessionStore {
    pub(crate) fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
        }
    }

    pub(crate) async fn create(&self) -> (SessionId, FormSession) {
        let mut sessions = self.sessions.lock().await;
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, session)| session.created_at)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            info!(session_id = %oldest, "evicted oldest form session");
        }

        let id = SessionId::new_random();
        let session = FormSession::new();
        sessions.insert(id, session.clone());
        (id, session)
    }

    /// Runs `f` against a session while holding the store lock.
    pub(crate) async fn update<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut FormSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.lock().await;
        sessions.get_mut(&id).map(f)
    }

    pub(crate) async fn remove(&self, id: SessionId) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }
}
