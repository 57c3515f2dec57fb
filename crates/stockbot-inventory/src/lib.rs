// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inventory loading for the stockbot assistant.
//!
//! The inventory is a CSV file read fresh on every inbound message. Every
//! column is kept so the model sees exactly what the spreadsheet holds.

pub mod render;
pub mod sample;
pub mod source;

pub use render::{column_list, render_table};
pub use sample::SAMPLE_INVENTORY_CSV;
pub use source::CsvInventory;
