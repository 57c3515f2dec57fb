// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model backend for deterministic testing.
//!
//! `MockModel` implements `ModelBackend` with pre-configured responses and
//! per-operation call counters, enabling fast tests without the Gemini API.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use stockbot_core::StockbotError;
use stockbot_core::traits::{ModelBackend, PluginAdapter};
use stockbot_core::types::{AdapterType, GenerateRequest, HealthStatus, ModelInfo, UploadedFile};

const DEFAULT_MODELS: &[&str] = &["gemini-1.5-flash", "gemini-1.5-pro"];

/// A file handed to [`MockModel::upload_file`], as seen at upload time.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub path: PathBuf,
    pub mime_type: String,
    pub size: u64,
}

/// A mock model backend that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
pub struct MockModel {
    responses: Arc<Mutex<VecDeque<String>>>,
    available: Option<HashSet<String>>,
    fail_generation: bool,
    fail_upload: bool,
    fail_listing: bool,
    panic_generation: bool,
    probe_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl MockModel {
    /// Every model answers the probe; replies default to "mock response".
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            available: None,
            fail_generation: false,
            fail_upload: false,
            fail_listing: false,
            panic_generation: false,
            probe_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock model pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let model = Self::new();
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..model
        }
    }

    /// Only the named models answer the probe. An empty slice makes every
    /// probe fail.
    pub fn with_available_models(mut self, models: &[&str]) -> Self {
        self.available = Some(models.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn failing_generation(mut self) -> Self {
        self.fail_generation = true;
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// `generate` panics instead of returning.
    pub fn panicking_generation(mut self) -> Self {
        self.panic_generation = true;
        self
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    /// The most recent generation request, including failed ones.
    pub async fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().await.last().cloned()
    }

    pub async fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().await.clone()
    }

    fn serves(&self, model: &str) -> bool {
        match &self.available {
            Some(models) => models.contains(model),
            None => true,
        }
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockModel {
    fn name(&self) -> &str {
        "mock-model"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Model
    }

    async fn health_check(&self) -> Result<HealthStatus, StockbotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ModelBackend for MockModel {
    async fn probe(&self, model: &str) -> Result<(), StockbotError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        if self.serves(model) {
            Ok(())
        } else {
            Err(StockbotError::provider(format!("model {model} not found")))
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, StockbotError> {
        if self.fail_listing {
            return Err(StockbotError::provider("listing unavailable"));
        }
        let names: Vec<String> = match &self.available {
            Some(models) => {
                let mut names: Vec<String> = models.iter().cloned().collect();
                names.sort();
                names
            }
            None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        };
        Ok(names
            .into_iter()
            .map(|name| ModelInfo {
                display_name: name.clone(),
                name,
                supported_methods: vec!["generateContent".to_string()],
            })
            .collect())
    }

    async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<UploadedFile, StockbotError> {
        let n = self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let size = tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0);
        self.uploads.lock().await.push(RecordedUpload {
            path: path.to_path_buf(),
            mime_type: mime_type.to_string(),
            size,
        });
        if self.fail_upload {
            return Err(StockbotError::provider("upload rejected"));
        }
        Ok(UploadedFile {
            uri: format!("mock://files/{n}"),
            mime_type: mime_type.to_string(),
        })
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, StockbotError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);
        if self.panic_generation {
            panic!("mock model panicked");
        }
        if self.fail_generation {
            return Err(StockbotError::provider("quota exceeded"));
        }
        Ok(self.next_response().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            model: "gemini-1.5-flash".into(),
            history: vec![],
            prompt: "hola".into(),
            file: None,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let model = MockModel::new();
        assert_eq!(model.generate(request()).await.unwrap(), "mock response");
        assert_eq!(model.generate_calls(), 1);
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let model = MockModel::with_responses(vec!["first".into(), "second".into()]);
        assert_eq!(model.generate(request()).await.unwrap(), "first");
        assert_eq!(model.generate(request()).await.unwrap(), "second");
        assert_eq!(model.generate(request()).await.unwrap(), "mock response");
    }

    #[tokio::test]
    async fn probe_respects_available_models() {
        let model = MockModel::new().with_available_models(&["gemini-pro"]);
        assert!(model.probe("gemini-1.5-flash").await.is_err());
        assert!(model.probe("gemini-pro").await.is_ok());
        assert_eq!(model.probe_calls(), 2);
        let listed = model.list_models().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "gemini-pro");
    }

    #[tokio::test]
    async fn failing_generation_still_records_request() {
        let model = MockModel::new().failing_generation();
        assert!(model.generate(request()).await.is_err());
        assert_eq!(model.last_request().await.unwrap().prompt, "hola");
    }
}
