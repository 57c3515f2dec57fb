// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete dispatcher with mock model and media
//! adapters, a CSV inventory in a temp directory, and an in-memory session
//! store. Provides `send_text()` and `send_media()` to drive the pipeline.

use std::sync::Arc;
use std::time::Duration;

use stockbot_agent::{Dispatcher, ModelGateway};
use stockbot_config::StockbotConfig;
use stockbot_context::{PromptComposer, SystemPolicy};
use stockbot_core::types::{InboundMessage, MediaRef};
use stockbot_core::{InventorySource, SessionStore, StockbotError};
use stockbot_inventory::{CsvInventory, SAMPLE_INVENTORY_CSV};
use stockbot_session::{MemorySessionStore, SessionManager};

use crate::mock_media::MockMedia;
use crate::mock_model::MockModel;

enum InventorySetup {
    Csv(String),
    Source(Arc<dyn InventorySource>),
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    model: MockModel,
    media: MockMedia,
    inventory: InventorySetup,
    config: StockbotConfig,
    sessions_enabled: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            model: MockModel::new(),
            media: MockMedia::new(),
            inventory: InventorySetup::Csv(SAMPLE_INVENTORY_CSV.to_string()),
            config: StockbotConfig::default(),
            sessions_enabled: true,
        }
    }

    /// Set mock model responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.model = MockModel::with_responses(responses);
        self
    }

    pub fn with_model(mut self, model: MockModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_media(mut self, media: MockMedia) -> Self {
        self.media = media;
        self
    }

    /// Contents of the inventory CSV file. An empty string leaves the file
    /// absent.
    pub fn with_inventory_csv(mut self, csv: &str) -> Self {
        self.inventory = InventorySetup::Csv(csv.to_string());
        self
    }

    pub fn with_inventory(mut self, source: impl InventorySource) -> Self {
        self.inventory = InventorySetup::Source(Arc::new(source));
        self
    }

    pub fn with_config(mut self, config: StockbotConfig) -> Self {
        self.config = config;
        self
    }

    /// Run without a session store, as when the cache is unreachable.
    pub fn without_sessions(mut self) -> Self {
        self.sessions_enabled = false;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, StockbotError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| StockbotError::Storage {
            source: Box::new(e),
        })?;
        let mut config = self.config;

        let inventory: Arc<dyn InventorySource> = match self.inventory {
            InventorySetup::Csv(csv) => {
                let path = temp_dir.path().join("inventario.csv");
                if !csv.is_empty() {
                    tokio::fs::write(&path, csv)
                        .await
                        .map_err(|e| StockbotError::Internal(format!("fixture write: {e}")))?;
                }
                config.inventory.path = path.to_string_lossy().into_owned();
                Arc::new(CsvInventory::new(path))
            }
            InventorySetup::Source(source) => source,
        };

        let sessions = if self.sessions_enabled {
            let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new("stockbot:test"));
            SessionManager::new(
                Some(store),
                Duration::from_secs(config.cache.ttl_secs),
                config.agent.max_history_turns,
            )
        } else {
            SessionManager::disabled()
        };

        let model = Arc::new(self.model);
        let media = Arc::new(self.media);
        let gateway = Arc::new(ModelGateway::from_config(model.clone(), &config));
        let composer = PromptComposer::new(SystemPolicy::load(&config.agent).await);
        let dispatcher = Arc::new(Dispatcher::from_config(
            &config,
            composer,
            sessions,
            gateway,
            inventory,
            media.clone(),
        ));

        Ok(TestHarness {
            model,
            media,
            dispatcher,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp inventory.
pub struct TestHarness {
    /// The mock model backend.
    pub model: Arc<MockModel>,
    /// The mock media source.
    pub media: Arc<MockMedia>,
    /// Dispatcher wired to the mocks.
    pub dispatcher: Arc<Dispatcher>,
    /// Effective configuration, with `inventory.path` pointing at the temp file.
    pub config: StockbotConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn sessions(&self) -> &SessionManager {
        self.dispatcher.sessions()
    }

    /// Send a text message through the dispatcher and return the reply.
    pub async fn send_text(&self, from: &str, body: &str) -> String {
        self.dispatcher
            .dispatch(InboundMessage {
                sender_id: from.to_string(),
                body: body.to_string(),
                media: None,
            })
            .await
    }

    /// Send a message carrying one attachment of `content_type`.
    pub async fn send_media(&self, from: &str, caption: &str, content_type: &str) -> String {
        self.dispatcher
            .dispatch(InboundMessage {
                sender_id: from.to_string(),
                body: caption.to_string(),
                media: Some(MediaRef {
                    url: "https://api.twilio.com/2010-04-01/Accounts/AC0/Messages/MM0/Media/ME0"
                        .to_string(),
                    content_type: content_type.to_string(),
                }),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let harness = TestHarness::builder().build().await.unwrap();
        assert!(harness.sessions().is_enabled());
        assert!(harness.config.inventory.path.ends_with("inventario.csv"));
    }

    #[tokio::test]
    async fn with_mock_responses_uses_responses() {
        let harness = TestHarness::builder()
            .with_mock_responses(vec!["custom response".to_string()])
            .build()
            .await
            .unwrap();

        let resp = harness.send_text("whatsapp:+1", "¿tienen tablets?").await;
        assert_eq!(resp, "custom response");
    }

    #[tokio::test]
    async fn missing_inventory_file_answers_no_information() {
        let harness = TestHarness::builder()
            .with_inventory_csv("")
            .build()
            .await
            .unwrap();

        let resp = harness.send_text("whatsapp:+1", "¿tienen tablets?").await;
        assert_eq!(resp, harness.config.messages.no_information);
        assert_eq!(harness.model.generate_calls(), 0);
    }

    #[tokio::test]
    async fn without_sessions_still_answers() {
        let harness = TestHarness::builder()
            .without_sessions()
            .build()
            .await
            .unwrap();
        assert!(!harness.sessions().is_enabled());

        harness.send_text("whatsapp:+1", "¿tienen tablets?").await;
        harness.send_text("whatsapp:+1", "¿y celulares?").await;
        let last = harness.model.last_request().await.unwrap();
        assert!(last.history.is_empty());
    }
}
