// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation session storage for the stockbot assistant.
//!
//! Sessions live in an expiring key-value store. The store is optional:
//! [`connect_store`] probes it once at startup and, if it is unset or
//! unreachable, the [`SessionManager`] runs stateless for the life of the
//! process.

pub mod manager;
pub mod memory;
pub mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use stockbot_config::model::CacheConfig;
use stockbot_core::traits::SessionStore;
use tracing::{info, warn};

pub use manager::SessionManager;
pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

/// Upper bound on the startup connectivity probe.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the configured session store, or `None` when sessions are disabled.
///
/// Never fails: an unreachable cache is logged and treated as absent.
pub async fn connect_store(config: &CacheConfig) -> Option<Arc<dyn SessionStore>> {
    let Some(url) = config.url.as_deref() else {
        info!("no cache url configured, sessions disabled");
        return None;
    };

    if url.starts_with("memory://") {
        info!("using in-process session store");
        return Some(Arc::new(MemorySessionStore::new(&config.key_prefix)));
    }

    match tokio::time::timeout(
        CONNECT_TIMEOUT,
        RedisSessionStore::connect(url, &config.key_prefix),
    )
    .await
    {
        Ok(Ok(store)) => {
            info!("connected to redis session store");
            Some(Arc::new(store))
        }
        Ok(Err(e)) => {
            warn!(error = %e, "redis unreachable, sessions disabled");
            None
        }
        Err(_) => {
            warn!(timeout = ?CONNECT_TIMEOUT, "redis probe timed out, sessions disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_url_disables_sessions() {
        assert!(connect_store(&CacheConfig::default()).await.is_none());
    }

    #[tokio::test]
    async fn memory_url_selects_in_process_store() {
        let config = CacheConfig {
            url: Some("memory://".into()),
            ..Default::default()
        };
        let store = connect_store(&config).await.expect("memory store");
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn unreachable_redis_disables_sessions() {
        let config = CacheConfig {
            url: Some("redis://127.0.0.1:1/".into()),
            ..Default::default()
        };
        assert!(connect_store(&config).await.is_none());
    }
}
