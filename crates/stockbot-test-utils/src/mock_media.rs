// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock media and inventory sources.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use stockbot_core::StockbotError;
use stockbot_core::traits::{InventorySource, MediaSource, PluginAdapter};
use stockbot_core::types::{AdapterType, Attachment, HealthStatus, InventoryTable, MediaRef};
use stockbot_inventory::SAMPLE_INVENTORY_CSV;
use stockbot_inventory::source::parse_csv;

/// Returns fixed bytes for every download, tagged with the announced type.
pub struct MockMedia {
    payload: Vec<u8>,
    fail: bool,
    fetch_calls: AtomicUsize,
}

impl MockMedia {
    pub fn new() -> Self {
        Self::with_payload(vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self {
            payload,
            fail: false,
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Every download fails as if the media URL returned 404.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockMedia {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockMedia {
    fn name(&self) -> &str {
        "mock-media"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, StockbotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl MediaSource for MockMedia {
    async fn fetch(&self, media: &MediaRef) -> Result<Attachment, StockbotError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StockbotError::channel("media download returned 404 Not Found"));
        }
        Ok(Attachment {
            data: self.payload.clone(),
            mime_type: media.content_type.clone(),
        })
    }
}

/// Inventory source over a fixed table.
pub struct StaticInventory {
    table: Option<InventoryTable>,
}

impl StaticInventory {
    pub fn new(table: InventoryTable) -> Self {
        Self { table: Some(table) }
    }

    /// The ten-product sample catalogue written by `stockbot init`.
    pub fn sample() -> Self {
        Self::new(parse_csv(SAMPLE_INVENTORY_CSV.as_bytes()).unwrap_or_else(|_| InventoryTable::empty()))
    }

    pub fn empty() -> Self {
        Self::new(InventoryTable::empty())
    }

    /// Every load fails with an inventory error.
    pub fn failing() -> Self {
        Self { table: None }
    }
}

#[async_trait]
impl PluginAdapter for StaticInventory {
    fn name(&self) -> &str {
        "static-inventory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Inventory
    }

    async fn health_check(&self) -> Result<HealthStatus, StockbotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl InventorySource for StaticInventory {
    async fn load(&self) -> Result<InventoryTable, StockbotError> {
        self.table.clone().ok_or_else(|| StockbotError::Inventory {
            message: "inventory file not found".to_string(),
            source: None,
        })
    }
}
