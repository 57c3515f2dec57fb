// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for stockbot integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockModel`] - Mock model backend with queued responses and call counters
//! - [`MockMedia`] - Mock media source returning fixed bytes
//! - [`StaticInventory`] - Inventory source over an in-memory table
//! - [`TestHarness`] - A dispatcher wired to the mocks and an in-memory session store

pub mod harness;
pub mod mock_media;
pub mod mock_model;

pub use harness::TestHarness;
pub use mock_media::{MockMedia, StaticInventory};
pub use mock_model::{MockModel, RecordedUpload};
