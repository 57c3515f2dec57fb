// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model backend trait for hosted LLM providers (Gemini).

use std::path::Path;

use async_trait::async_trait;

use crate::error::StockbotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GenerateRequest, ModelInfo, UploadedFile};

/// Adapter for a hosted language model provider.
///
/// Backends are stateless with respect to endpoint choice; resolution and
/// caching live in the model gateway.
#[async_trait]
pub trait ModelBackend: PluginAdapter {
    /// Sends a trivial generation to `model` to check it is serviceable.
    async fn probe(&self, model: &str) -> Result<(), StockbotError>;

    /// Lists models that support content generation.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, StockbotError>;

    /// Uploads a staged file so it can be referenced in a generation call.
    async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<UploadedFile, StockbotError>;

    /// Runs a generation and returns the response text.
    async fn generate(&self, request: GenerateRequest) -> Result<String, StockbotError>;
}
