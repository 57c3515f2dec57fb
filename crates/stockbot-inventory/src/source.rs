// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV-backed [`InventorySource`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use stockbot_core::error::StockbotError;
use stockbot_core::traits::{InventorySource, PluginAdapter};
use stockbot_core::types::{AdapterType, HealthStatus, InventoryTable};
use tracing::debug;

/// Reads the inventory table from a CSV file on every call.
#[derive(Debug, Clone)]
pub struct CsvInventory {
    path: PathBuf,
}

impl CsvInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parses CSV bytes into a table. Every row is fitted to the header width:
/// short rows are padded with empty cells and cells past the last header
/// are dropped. Blank lines are skipped.
pub fn parse_csv(bytes: &[u8]) -> Result<InventoryTable, StockbotError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(inventory_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(inventory_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.len() > columns.len() {
            debug!(
                line = record.position().map(|p| p.line()),
                extra = row.len() - columns.len(),
                "dropping cells without a header"
            );
        }
        row.resize(columns.len(), String::new());
        rows.push(row);
    }

    Ok(InventoryTable { columns, rows })
}

fn inventory_error(e: csv::Error) -> StockbotError {
    StockbotError::Inventory {
        message: "malformed inventory CSV".to_string(),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for CsvInventory {
    fn name(&self) -> &str {
        "csv"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Inventory
    }

    async fn health_check(&self) -> Result<HealthStatus, StockbotError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Degraded(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[async_trait]
impl InventorySource for CsvInventory {
    async fn load(&self) -> Result<InventoryTable, StockbotError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StockbotError::Inventory {
                message: format!("cannot read {}", self.path.display()),
                source: Some(Box::new(e)),
            })?;
        let table = parse_csv(&bytes)?;
        debug!(path = %self.path.display(), rows = table.len(), "inventory loaded");
        Ok(table)
    }
}
