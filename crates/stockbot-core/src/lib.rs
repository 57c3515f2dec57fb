// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the stockbot inventory assistant.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by every other crate in the workspace. Each external collaborator
//! (model provider, session cache, inventory file, media download) sits
//! behind a trait defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::StockbotError;
pub use types::{AdapterType, HealthStatus};

pub use traits::{InventorySource, MediaSource, ModelBackend, PluginAdapter, SessionStore};
