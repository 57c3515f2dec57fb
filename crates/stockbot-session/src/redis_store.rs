// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis-backed session store.
//!
//! Each session is one string key holding the JSON-serialized session,
//! written with `SETEX key ttl value`. Sub-second TTLs round up to 1 s.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use stockbot_core::error::StockbotError;
use stockbot_core::traits::{PluginAdapter, SessionStore};
use stockbot_core::types::{AdapterType, ConversationSession, HealthStatus};
use tracing::debug;

/// Key used by the connectivity probe. Its value is never read.
const PROBE_KEY: &str = "stockbot:probe";

pub struct RedisSessionStore {
    conn: ConnectionManager,
    prefix: String,
}

fn storage_error(e: impl std::error::Error + Send + Sync + 'static) -> StockbotError {
    StockbotError::Storage {
        source: Box::new(e),
    }
}

impl RedisSessionStore {
    /// Opens a managed connection and round-trips one command to prove the
    /// server answers.
    pub async fn connect(url: &str, prefix: &str) -> Result<Self, StockbotError> {
        let client = redis::Client::open(url).map_err(storage_error)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(storage_error)?;
        let store = Self {
            conn,
            prefix: prefix.to_string(),
        };
        store.ping().await?;
        Ok(store)
    }

    async fn ping(&self) -> Result<(), StockbotError> {
        let mut conn = self.conn.clone();
        let _: bool = conn.exists(PROBE_KEY).await.map_err(storage_error)?;
        Ok(())
    }

    fn key(&self, user_id: &str) -> String {
        format!("{}{user_id}", self.prefix)
    }
}

#[async_trait]
impl PluginAdapter for RedisSessionStore {
    fn name(&self) -> &str {
        "redis"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SessionStore
    }

    async fn health_check(&self) -> Result<HealthStatus, StockbotError> {
        match self.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationSession>, StockbotError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.key(user_id)).await.map_err(storage_error)?;
        raw.map(|json| serde_json::from_str(&json).map_err(storage_error))
            .transpose()
    }

    async fn put(&self, session: &ConversationSession, ttl: Duration) -> Result<(), StockbotError> {
        let json = serde_json::to_string(session).map_err(storage_error)?;
        let mut conn = self.conn.clone();
        let () = conn
            .set_ex(self.key(&session.user_id), json, ttl.as_secs().max(1))
            .await
            .map_err(storage_error)?;
        debug!(user_id = %session.user_id, turns = session.history.len(), "session stored");
        Ok(())
    }
}
