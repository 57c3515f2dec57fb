// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle on top of an optional [`SessionStore`].

use std::sync::Arc;
use std::time::Duration;

use stockbot_core::traits::SessionStore;
use stockbot_core::types::ConversationSession;
use tracing::{debug, warn};

/// Loads and saves conversation sessions.
///
/// Store failures never reach the caller: a failed read yields a fresh
/// session and a failed write is dropped, both with a warning.
#[derive(Clone)]
pub struct SessionManager {
    store: Option<Arc<dyn SessionStore>>,
    ttl: Duration,
    max_turns: usize,
}

impl SessionManager {
    pub fn new(store: Option<Arc<dyn SessionStore>>, ttl: Duration, max_turns: usize) -> Self {
        Self {
            store,
            ttl,
            max_turns,
        }
    }

    /// A manager with no backing store.
    pub fn disabled() -> Self {
        Self::new(None, Duration::ZERO, 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// `"redis"`, `"memory"` or `"disabled"`.
    pub fn backend_name(&self) -> &str {
        self.store.as_deref().map_or("disabled", |s| s.name())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the stored session for `user_id`, or a new empty one.
    pub async fn load(&self, user_id: &str) -> ConversationSession {
        let Some(store) = &self.store else {
            return ConversationSession::new(user_id);
        };
        match store.get(user_id).await {
            Ok(Some(session)) => {
                debug!(user_id, turns = session.history.len(), "session loaded");
                session
            }
            Ok(None) => ConversationSession::new(user_id),
            Err(e) => {
                warn!(user_id, error = %e, "session read failed, starting fresh");
                ConversationSession::new(user_id)
            }
        }
    }

    /// Trims history to the newest turns and overwrites the stored session.
    pub async fn save(&self, mut session: ConversationSession) {
        let Some(store) = &self.store else {
            return;
        };
        session.truncate_history(self.max_turns);
        if let Err(e) = store.put(&session, self.ttl).await {
            warn!(user_id = %session.user_id, error = %e, "session write dropped");
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("backend", &self.backend_name())
            .field("ttl", &self.ttl)
            .field("max_turns", &self.max_turns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySessionStore;
    use async_trait::async_trait;
    use stockbot_core::error::StockbotError;
    use stockbot_core::traits::PluginAdapter;
    use stockbot_core::types::{AdapterType, HealthStatus};
    use tracing_test::traced_test;

    const TTL: Duration = Duration::from_secs(3600);

    fn memory_manager(max_turns: usize) -> (SessionManager, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new("chat_session_"));
        let shared: Arc<dyn SessionStore> = store.clone();
        let manager = SessionManager::new(Some(shared), TTL, max_turns);
        (manager, store)
    }

    struct BrokenStore;

    #[async_trait]
    impl PluginAdapter for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::SessionStore
        }
        async fn health_check(&self) -> Result<HealthStatus, StockbotError> {
            Ok(HealthStatus::Unhealthy("down".into()))
        }
    }

    #[async_trait]
    impl SessionStore for BrokenStore {
        async fn get(&self, _: &str) -> Result<Option<ConversationSession>, StockbotError> {
            Err(StockbotError::Storage {
                source: "connection reset".into(),
            })
        }
        async fn put(&self, _: &ConversationSession, _: Duration) -> Result<(), StockbotError> {
            Err(StockbotError::Storage {
                source: "connection reset".into(),
            })
        }
    }

    #[tokio::test]
    async fn disabled_manager_is_stateless() {
        let manager = SessionManager::disabled();
        let mut session = manager.load("u1").await;
        session.record_exchange("hola", "¡Hola!");
        manager.save(session).await;

        assert!(manager.load("u1").await.history.is_empty());
        assert_eq!(manager.backend_name(), "disabled");
        assert!(!manager.is_enabled());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (manager, _) = memory_manager(20);
        let mut session = manager.load("u1").await;
        session.record_exchange("¿hay mouse?", "📦 Mouse: 25 unidades");
        manager.save(session.clone()).await;

        assert_eq!(manager.load("u1").await, session);
        assert_eq!(manager.backend_name(), "memory");
    }

    #[tokio::test]
    async fn save_caps_history() {
        let (manager, store) = memory_manager(4);
        let mut session = ConversationSession::new("u1");
        for i in 0..10 {
            session.record_exchange(format!("q{i}"), format!("a{i}"));
        }
        manager.save(session).await;

        let stored = store.get("u1").await.unwrap().unwrap();
        assert_eq!(stored.history.len(), 4);
        assert_eq!(stored.history[0].content, "q8");
    }

    #[tokio::test]
    #[traced_test]
    async fn store_errors_degrade_quietly() {
        let manager = SessionManager::new(Some(Arc::new(BrokenStore)), TTL, 20);
        let session = manager.load("u1").await;
        assert!(session.history.is_empty());
        assert_eq!(session.user_id, "u1");
        manager.save(session).await;
        assert!(logs_contain("session read failed"));
        assert!(logs_contain("session write dropped"));
    }

    #[tokio::test]
    async fn concurrent_same_user_writes_last_one_wins() {
        let (manager, store) = memory_manager(100);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let manager = manager.clone();
                tokio::spawn(async move {
                    let mut session = ConversationSession::new("u1");
                    for _ in 0..=i {
                        session.record_exchange(format!("q{i}"), format!("a{i}"));
                    }
                    manager.save(session).await;
                })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }

        let stored = store.get("u1").await.unwrap().expect("one write survives");
        let n = stored.history.len() / 2;
        assert!((1..=16).contains(&n));
        let marker = format!("q{}", n - 1);
        assert!(stored.history.iter().step_by(2).all(|t| t.content == marker));
    }
}
