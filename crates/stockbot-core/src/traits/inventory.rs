// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inventory source trait for tabular product data.

use async_trait::async_trait;

use crate::error::StockbotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::InventoryTable;

/// Adapter that loads the full inventory table.
///
/// Called once per inbound message; implementations must not cache across calls.
#[async_trait]
pub trait InventorySource: PluginAdapter {
    async fn load(&self) -> Result<InventoryTable, StockbotError>;
}
