// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media source trait for downloading attachments referenced by the messaging provider.

use async_trait::async_trait;

use crate::error::StockbotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Attachment, MediaRef};

/// Adapter that fetches the bytes behind a provider-supplied media URL.
#[async_trait]
pub trait MediaSource: PluginAdapter {
    async fn fetch(&self, media: &MediaRef) -> Result<Attachment, StockbotError>;
}
