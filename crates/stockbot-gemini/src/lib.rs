// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini model backend for the stockbot assistant.
//!
//! [`GeminiBackend`] implements [`ModelBackend`] on top of the REST
//! [`GeminiClient`]: liveness probes, model listing, file upload and
//! history-aware content generation.

pub mod client;
pub mod types;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use stockbot_config::StockbotConfig;
use stockbot_core::error::StockbotError;
use stockbot_core::traits::{ModelBackend, PluginAdapter};
use stockbot_core::types::{
    AdapterType, GenerateRequest, HealthStatus, ModelInfo, Role, UploadedFile,
};
use tracing::{debug, info};

pub use crate::client::GeminiClient;
use crate::types::{Content, FileData, Part};

/// Generation method a model must support to be usable.
const GENERATE_METHOD: &str = "generateContent";

/// Gemini implementation of [`ModelBackend`].
pub struct GeminiBackend {
    client: GeminiClient,
    probe_prompt: String,
}

impl GeminiBackend {
    /// Builds the backend from `[gemini]` configuration.
    ///
    /// Fails with a config error when no API key is set.
    pub fn from_config(config: &StockbotConfig) -> Result<Self, StockbotError> {
        let api_key = config
            .gemini
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StockbotError::Config("gemini.api_key is not set".into()))?;

        let client = GeminiClient::new(api_key, Duration::from_secs(config.gemini.timeout_secs))?
            .with_base_url(&config.gemini.base_url);

        info!(base_url = client.base_url(), "Gemini backend initialized");
        Ok(Self::with_client(client, config.gemini.probe_prompt.clone()))
    }

    pub fn with_client(client: GeminiClient, probe_prompt: String) -> Self {
        Self {
            client,
            probe_prompt,
        }
    }
}

/// Maps history plus the new user turn onto Gemini `contents`. The prompt
/// text precedes the file reference in the final turn.
fn to_contents(request: GenerateRequest) -> Vec<Content> {
    let mut contents: Vec<Content> = request
        .history
        .into_iter()
        .map(|turn| {
            let role = match turn.role {
                Role::User => "user",
                Role::Model => "model",
            };
            Content::text(role, turn.content)
        })
        .collect();

    let mut parts = vec![Part::Text {
        text: request.prompt,
    }];
    if let Some(file) = request.file {
        parts.push(Part::FileData {
            file_data: FileData {
                mime_type: file.mime_type,
                file_uri: file.uri,
            },
        });
    }
    contents.push(Content {
        role: Some("user".to_string()),
        parts,
    });
    contents
}

#[async_trait]
impl PluginAdapter for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Model
    }

    async fn health_check(&self) -> Result<HealthStatus, StockbotError> {
        match self.client.list_models().await {
            Ok(models) if models.is_empty() => {
                Ok(HealthStatus::Degraded("no models visible".into()))
            }
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn probe(&self, model: &str) -> Result<(), StockbotError> {
        self.client
            .generate_content(model, vec![Content::text("user", &self.probe_prompt)])
            .await
            .map(|_| ())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, StockbotError> {
        let models = self.client.list_models().await?;
        Ok(models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == GENERATE_METHOD)
            })
            .map(|m| ModelInfo {
                name: m.name,
                display_name: m.display_name,
                supported_methods: m.supported_generation_methods,
            })
            .collect())
    }

    async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<UploadedFile, StockbotError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| StockbotError::Internal(format!("cannot read staged file: {e}")))?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        let file = self.client.upload_file(&display_name, mime_type, data).await?;
        let mime_type = if file.mime_type.is_empty() {
            mime_type.to_string()
        } else {
            file.mime_type
        };
        Ok(UploadedFile {
            uri: file.uri,
            mime_type,
        })
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, StockbotError> {
        let model = request.model.clone();
        debug!(
            model = %model,
            history = request.history.len(),
            with_file = request.file.is_some(),
            "generating"
        );
        self.client
            .generate_content(&model, to_contents(request))
            .await
    }
}
