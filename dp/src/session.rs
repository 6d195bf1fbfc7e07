//! Per-conversation session state
//!
//! Keys one [`ConversationState`] per session id. Turns within one
//! session are serialized by that session's own lock; distinct sessions
//! proceed in parallel. Nothing here is persistent - a session lives as
//! long as the process.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::controller::{Controller, ConversationState};

pub struct SessionManager {
    controller: Controller,
    sessions: Mutex<HashMap<String, Arc<Mutex<ConversationState>>>>,
}

impl SessionManager {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Run one conversational turn for the given session.
    pub async fn turn(&self, session_id: &str, text: &str) -> String {
        let slot = {
            let mut sessions = self.sessions.lock().await;
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(ConversationState::default())))
                .clone()
        };

        // only this session waits here; the map lock is already released
        let mut state = slot.lock().await;
        debug!(session_id, "turn: processing");
        self.controller.handle_turn(&mut state, text).await
    }

    /// Drop a session's state entirely; returns false for unknown ids.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.lock().await.remove(session_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::TaskSink;
    use crate::llm::client::mock::MockLlmClient;
    use crate::plan::RawTask;

    struct NullSink;

    impl TaskSink for NullSink {
        fn create(&self, _task: &RawTask) -> eyre::Result<()> {
            Ok(())
        }
    }

    fn manager() -> SessionManager {
        let llm = Arc::new(MockLlmClient::with_text(
            r#"{"tasks":[{"title":"Write report","est_minutes":60,"priority":1}]}"#,
        ));
        SessionManager::new(Controller::new(llm, Arc::new(NullSink)))
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let mgr = manager();

        let a = mgr.turn("alice", "plan my day").await;
        assert!(a.contains("Agenda for today:"));

        // bob has no plan, so an edit-looking message is a first turn
        let b = mgr.turn("bob", "сдвинь отчёт на 14:00").await;
        assert!(b.contains("Agenda for today:"));
    }

    #[tokio::test]
    async fn same_session_keeps_its_plan() {
        let mgr = manager();

        mgr.turn("alice", "plan my day").await;
        let reply = mgr.turn("alice", "новые задачи").await;
        assert!(reply.contains("Ok!"));
    }

    #[tokio::test]
    async fn remove_forgets_state() {
        let mgr = manager();
        mgr.turn("alice", "plan my day").await;

        assert!(mgr.remove("alice").await);
        assert!(!mgr.remove("alice").await);
    }
}
