// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process expiring session store.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use stockbot_core::error::StockbotError;
use stockbot_core::traits::{PluginAdapter, SessionStore};
use stockbot_core::types::{AdapterType, ConversationSession, HealthStatus};
use tokio::time::Instant;

/// Sessions held as serialized JSON with an absolute expiry, so the memory
/// and redis backends store exactly the same bytes.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    prefix: String,
    entries: DashMap<String, (String, Instant)>,
}

impl MemorySessionStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: DashMap::new(),
        }
    }

    fn key(&self, user_id: &str) -> String {
        format!("{}{user_id}", self.prefix)
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.value().1 > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PluginAdapter for MemorySessionStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SessionStore
    }

    async fn health_check(&self) -> Result<HealthStatus, StockbotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationSession>, StockbotError> {
        let key = self.key(user_id);
        let json = match self.entries.get(&key) {
            Some(entry) if entry.value().1 > Instant::now() => entry.value().0.clone(),
            Some(entry) => {
                drop(entry);
                self.entries.remove(&key);
                return Ok(None);
            }
            None => return Ok(None),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StockbotError::Storage {
                source: Box::new(e),
            })
    }

    async fn put(&self, session: &ConversationSession, ttl: Duration) -> Result<(), StockbotError> {
        let json = serde_json::to_string(session).map_err(|e| StockbotError::Storage {
            source: Box::new(e),
        })?;
        let now = Instant::now();
        self.entries.retain(|_, (_, deadline)| *deadline > now);
        self.entries
            .insert(self.key(&session.user_id), (json, now + ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    fn session(user: &str, exchanges: usize) -> ConversationSession {
        let mut s = ConversationSession::new(user);
        for i in 0..exchanges {
            s.record_exchange(format!("pregunta {i}"), format!("respuesta {i}"));
        }
        s
    }

    #[tokio::test]
    async fn round_trip_before_expiry() {
        let store = MemorySessionStore::new("chat_session_");
        let original = session("whatsapp:+5215550001", 3);
        store.put(&original, TTL).await.unwrap();

        let loaded = store.get("whatsapp:+5215550001").await.unwrap();
        assert_eq!(loaded, Some(original));
    }

    #[tokio::test]
    async fn unknown_user_is_absent() {
        let store = MemorySessionStore::new("p_");
        assert!(store.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl() {
        let store = MemorySessionStore::new("p_");
        store.put(&session("u1", 1), TTL).await.unwrap();

        tokio::time::advance(TTL - Duration::from_secs(1)).await;
        assert!(store.get("u1").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.get("u1").await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn write_resets_expiry_window() {
        let store = MemorySessionStore::new("p_");
        store.put(&session("u1", 1), TTL).await.unwrap();
        tokio::time::advance(Duration::from_secs(3000)).await;
        store.put(&session("u1", 2), TTL).await.unwrap();
        tokio::time::advance(Duration::from_secs(3000)).await;

        let loaded = store.get("u1").await.unwrap().expect("still live");
        assert_eq!(loaded.history.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn put_purges_expired_entries_of_other_users() {
        let store = MemorySessionStore::new("p_");
        for i in 0..1000 {
            store
                .put(&session(&format!("u{i}"), 1), Duration::from_secs(10))
                .await
                .unwrap();
        }
        tokio::time::advance(TTL).await;
        store.put(&session("fresh", 1), TTL).await.unwrap();

        assert_eq!(store.entries.len(), 1);
        assert!(store.get("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn put_overwrites_wholesale() {
        let store = MemorySessionStore::new("p_");
        store.put(&session("u1", 5), TTL).await.unwrap();
        store.put(&session("u1", 1), TTL).await.unwrap();
        assert_eq!(store.get("u1").await.unwrap().unwrap().history.len(), 2);
        assert_eq!(store.len(), 1);
    }
}
