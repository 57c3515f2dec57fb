// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini REST API.
//!
//! Provides [`GeminiClient`] which handles authentication, content
//! generation, model listing and the resumable Files API upload. Every call
//! is attempted exactly once.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use stockbot_core::StockbotError;
use tracing::debug;

use crate::types::{
    ApiErrorResponse, ApiFile, ApiModel, Content, GenerateContentRequest, GenerateContentResponse,
    ListModelsResponse, StartUploadRequest, UploadMetadata, UploadResponse,
};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_VERSION: &str = "v1beta";

/// Pages fetched at most when listing models.
const MAX_MODEL_PAGES: usize = 10;

/// Polls made while an uploaded file is still `PROCESSING`.
const MAX_FILE_POLLS: u32 = 10;
const FILE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

fn provider_error(context: &str, e: reqwest::Error) -> StockbotError {
    StockbotError::Provider {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

impl GeminiClient {
    /// Creates a client authenticating with `api_key` via the
    /// `x-goog-api-key` header.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, StockbotError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| StockbotError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| provider_error("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: FILE_POLL_INTERVAL,
        })
    }

    /// Overrides the API host (configuration, or a wiremock server in tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[cfg(test)]
    fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs `generateContent` against `model` and returns the reply text.
    ///
    /// A response with no text (e.g. blocked by safety filters) is an error.
    pub async fn generate_content(
        &self,
        model: &str,
        contents: Vec<Content>,
    ) -> Result<String, StockbotError> {
        let model = model.strip_prefix("models/").unwrap_or(model);
        let url = format!(
            "{}/{API_VERSION}/models/{model}:generateContent",
            self.base_url
        );

        let response = self
            .client
            .post(&url)
            .json(&GenerateContentRequest { contents })
            .send()
            .await
            .map_err(|e| provider_error("HTTP request failed", e))?;

        let status = response.status();
        debug!(status = %status, model, "generateContent response received");
        let body = read_success_body(response).await?;

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| StockbotError::Provider {
                message: format!("failed to parse generateContent response: {e}"),
                source: Some(Box::new(e)),
            })?;

        parsed.text().ok_or_else(|| {
            let reason = parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .or_else(|| parsed.prompt_feedback.as_ref().map(|f| f.to_string()))
                .unwrap_or_else(|| "no candidates".to_string());
            StockbotError::provider(format!("model returned no text ({reason})"))
        })
    }

    /// Lists every model the key can see, following pagination.
    pub async fn list_models(&self) -> Result<Vec<ApiModel>, StockbotError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_MODEL_PAGES {
            let mut url = format!("{}/{API_VERSION}/models?pageSize=1000", self.base_url);
            if let Some(token) = &page_token {
                url.push_str("&pageToken=");
                url.push_str(token);
            }

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| provider_error("HTTP request failed", e))?;
            let body = read_success_body(response).await?;
            let page: ListModelsResponse =
                serde_json::from_str(&body).map_err(|e| StockbotError::Provider {
                    message: format!("failed to parse model list: {e}"),
                    source: Some(Box::new(e)),
                })?;

            models.extend(page.models);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = models.len(), "models listed");
        Ok(models)
    }

    /// Uploads `data` through the resumable Files API and waits until the
    /// file is usable.
    pub async fn upload_file(
        &self,
        display_name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<ApiFile, StockbotError> {
        let start_url = format!("{}/upload/{API_VERSION}/files", self.base_url);
        let start = self
            .client
            .post(&start_url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", data.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&StartUploadRequest {
                file: UploadMetadata {
                    display_name: display_name.to_string(),
                },
            })
            .send()
            .await
            .map_err(|e| provider_error("upload start failed", e))?;

        if !start.status().is_success() {
            return Err(api_error(start).await);
        }
        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| StockbotError::provider("upload start returned no upload URL"))?;

        let size = data.len();
        let finish = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(data)
            .send()
            .await
            .map_err(|e| provider_error("upload failed", e))?;
        let body = read_success_body(finish).await?;
        let uploaded: UploadResponse =
            serde_json::from_str(&body).map_err(|e| StockbotError::Provider {
                message: format!("failed to parse upload response: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(name = %uploaded.file.name, size, "file uploaded");

        self.wait_until_active(uploaded.file).await
    }

    async fn wait_until_active(&self, mut file: ApiFile) -> Result<ApiFile, StockbotError> {
        for _ in 0..MAX_FILE_POLLS {
            match file.state.as_deref() {
                Some("PROCESSING") => {
                    tokio::time::sleep(self.poll_interval).await;
                    file = self.get_file(&file.name).await?;
                }
                Some("FAILED") => {
                    return Err(StockbotError::provider(format!(
                        "file {} failed processing",
                        file.name
                    )));
                }
                _ => return Ok(file),
            }
        }
        Err(StockbotError::provider(format!(
            "file {} still processing",
            file.name
        )))
    }

    async fn get_file(&self, name: &str) -> Result<ApiFile, StockbotError> {
        let url = format!("{}/{API_VERSION}/{name}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| provider_error("HTTP request failed", e))?;
        let body = read_success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| StockbotError::Provider {
            message: format!("failed to parse file metadata: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Returns the body of a 2xx response, or the API error as a provider error.
async fn read_success_body(response: reqwest::Response) -> Result<String, StockbotError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    response
        .text()
        .await
        .map_err(|e| provider_error("failed to read response body", e))
}

async fn api_error(response: reqwest::Response) -> StockbotError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api) => format!(
            "Gemini API error {} ({}): {}",
            api.error.code, api.error.status, api.error.message
        ),
        Err(_) => format!("API returned {status}: {body}"),
    };
    StockbotError::provider(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-api-key", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url)
            .with_poll_interval(Duration::from_millis(1))
    }

    fn text_reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn generate_content_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "test"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client
            .generate_content("models/gemini-1.5-flash", vec![Content::text("user", "test")])
            .await
            .unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn generate_content_surfaces_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content("gemini-pro", vec![Content::text("user", "hola")])
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("RESOURCE_EXHAUSTED"), "got: {err}");
    }

    #[tokio::test]
    async fn generate_content_without_text_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content("gemini-pro", vec![Content::text("user", "hola")])
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("SAFETY"), "got: {err}");
    }

    #[tokio::test]
    async fn list_models_follows_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .and(query_param("pageToken", "next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{
                    "name": "models/gemini-1.5-flash",
                    "displayName": "Gemini 1.5 Flash",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                }],
                "nextPageToken": "next"
            })))
            .mount(&server)
            .await;

        let models = test_client(&server.uri()).list_models().await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].display_name, "Gemini 1.5 Flash");
        assert_eq!(models[1].name, "models/embedding-001");
    }

    #[tokio::test]
    async fn resumable_upload_two_steps() {
        let server = MockServer::start().await;
        let session_url = format!("{}/upload-session/42", server.uri());

        Mock::given(method("POST"))
            .and(path("/upload/v1beta/files"))
            .and(header("X-Goog-Upload-Protocol", "resumable"))
            .and(header("X-Goog-Upload-Command", "start"))
            .and(header("X-Goog-Upload-Header-Content-Length", "3"))
            .and(header("X-Goog-Upload-Header-Content-Type", "image/jpeg"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("x-goog-upload-url", session_url.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/upload-session/42"))
            .and(header("X-Goog-Upload-Offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "file": {
                    "name": "files/abc",
                    "uri": "https://generativelanguage.googleapis.com/v1beta/files/abc",
                    "mimeType": "image/jpeg",
                    "state": "PROCESSING"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "files/abc",
                "uri": "https://generativelanguage.googleapis.com/v1beta/files/abc",
                "mimeType": "image/jpeg",
                "state": "ACTIVE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = test_client(&server.uri())
            .upload_file("temp.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(file.state.as_deref(), Some("ACTIVE"));
        assert!(file.uri.ends_with("files/abc"));
    }

    #[tokio::test]
    async fn upload_without_session_url_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/v1beta/files"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .upload_file("a.wav", "audio/wav", vec![0])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no upload URL"));
    }
}
