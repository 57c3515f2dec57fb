// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the stockbot pipeline.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod inventory;
pub mod media;
pub mod model;
pub mod session;

pub use adapter::PluginAdapter;
pub use inventory::InventorySource;
pub use media::MediaSource;
pub use model::ModelBackend;
pub use session::SessionStore;
