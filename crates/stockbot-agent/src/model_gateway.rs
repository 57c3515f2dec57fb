// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Endpoint resolution and invocation of the hosted model.
//!
//! The first model in the preference list that answers a probe is cached
//! for the life of the process. A failed resolution caches nothing, so the
//! next caller probes again.

use std::sync::Arc;

use stockbot_config::StockbotConfig;
use stockbot_core::error::StockbotError;
use stockbot_core::traits::ModelBackend;
use stockbot_core::types::{Attachment, ChatTurn, GenerateRequest, MediaKind, ModelInfo};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Suffix appended to truncated replies.
const ELLIPSIS: &str = "...";

/// Cuts `text` to its first `limit` characters plus `"..."` when longer.
/// Counts Unicode scalar values and ignores word boundaries.
pub fn truncate_response(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

pub struct ModelGateway {
    backend: Arc<dyn ModelBackend>,
    preferred: Vec<String>,
    endpoint: OnceCell<String>,
    max_response_chars: usize,
}

impl ModelGateway {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        preferred: Vec<String>,
        max_response_chars: usize,
    ) -> Self {
        Self {
            backend,
            preferred,
            endpoint: OnceCell::new(),
            max_response_chars,
        }
    }

    pub fn from_config(backend: Arc<dyn ModelBackend>, config: &StockbotConfig) -> Self {
        Self::new(
            backend,
            config.gemini.preferred_models.clone(),
            config.agent.max_response_chars,
        )
    }

    pub fn backend(&self) -> &Arc<dyn ModelBackend> {
        &self.backend
    }

    pub fn preferred_models(&self) -> &[String] {
        &self.preferred
    }

    /// The resolved endpoint, if resolution has already succeeded.
    pub fn cached_endpoint(&self) -> Option<&str> {
        self.endpoint.get().map(String::as_str)
    }

    /// Returns the cached endpoint, probing the preference list on first use.
    ///
    /// Concurrent callers wait on a single resolution.
    pub async fn resolve_endpoint(&self) -> Option<String> {
        self.endpoint
            .get_or_try_init(|| self.probe_preferred())
            .await
            .ok()
            .cloned()
    }

    async fn probe_preferred(&self) -> Result<String, StockbotError> {
        for model in &self.preferred {
            match self.backend.probe(model).await {
                Ok(()) => {
                    info!(model = %model, "model endpoint resolved");
                    return Ok(model.clone());
                }
                Err(e) => debug!(model = %model, error = %e, "model probe failed"),
            }
        }
        warn!(tried = self.preferred.len(), "no preferred model answered the probe");
        Err(StockbotError::NoModelAvailable)
    }

    /// Text generation with prior history. The reply is truncated.
    pub async fn generate(
        &self,
        endpoint: &str,
        prompt: String,
        history: Vec<ChatTurn>,
    ) -> Result<String, StockbotError> {
        let reply = self
            .backend
            .generate(GenerateRequest {
                model: endpoint.to_string(),
                history,
                prompt,
                file: None,
            })
            .await?;
        Ok(truncate_response(&reply, self.max_response_chars))
    }

    /// Generation with an attached image or audio file.
    ///
    /// The bytes are staged to a named temporary file for upload; the file
    /// is removed whether or not the upload and generation succeed.
    pub async fn generate_with_attachment(
        &self,
        endpoint: &str,
        prompt: String,
        history: Vec<ChatTurn>,
        attachment: &Attachment,
        kind: MediaKind,
    ) -> Result<String, StockbotError> {
        let staged = tempfile::Builder::new()
            .prefix("stockbot_")
            .suffix(&format!(".{}", kind.default_extension()))
            .tempfile()
            .map_err(|e| StockbotError::Internal(format!("cannot create temp file: {e}")))?;
        tokio::fs::write(staged.path(), &attachment.data)
            .await
            .map_err(|e| StockbotError::Internal(format!("cannot stage attachment: {e}")))?;

        let uploaded = self
            .backend
            .upload_file(staged.path(), &attachment.mime_type)
            .await;
        if let Err(e) = staged.close() {
            warn!(error = %e, "failed to remove staged attachment");
        }
        let file = uploaded?;

        let reply = self
            .backend
            .generate(GenerateRequest {
                model: endpoint.to_string(),
                history,
                prompt,
                file: Some(file),
            })
            .await?;
        Ok(truncate_response(&reply, self.max_response_chars))
    }

    /// Models advertising content generation. Listing failures yield an
    /// empty list.
    pub async fn available_models(&self) -> Vec<ModelInfo> {
        match self.backend.list_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "model listing failed");
                Vec::new()
            }
        }
    }
}
