// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait for expiring conversation state.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StockbotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ConversationSession;

/// Adapter for an expiring key-value store holding conversation sessions.
///
/// Implementations must provide key-level atomic get/put; no application
/// locking is layered on top.
#[async_trait]
pub trait SessionStore: PluginAdapter {
    /// Returns the stored session for `user_id`, or `None` if absent or expired.
    async fn get(&self, user_id: &str) -> Result<Option<ConversationSession>, StockbotError>;

    /// Overwrites the stored session and resets its expiry to `ttl`.
    async fn put(&self, session: &ConversationSession, ttl: Duration) -> Result<(), StockbotError>;
}
