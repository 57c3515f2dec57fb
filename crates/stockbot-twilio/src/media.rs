// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media download for attachments announced in the webhook.
//!
//! Twilio media URLs require HTTP basic auth with the account SID and auth
//! token when the account enforces authenticated media. Downloads are
//! capped at a configured size.

use std::time::Duration;

use async_trait::async_trait;
use stockbot_config::model::TwilioConfig;
use stockbot_core::error::StockbotError;
use stockbot_core::traits::{MediaSource, PluginAdapter};
use stockbot_core::types::{AdapterType, Attachment, HealthStatus, MediaRef};
use tracing::debug;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// [`MediaSource`] that fetches Twilio-hosted attachments.
#[derive(Debug, Clone)]
pub struct TwilioMediaSource {
    client: reqwest::Client,
    credentials: Option<(String, String)>,
    max_bytes: usize,
}

impl TwilioMediaSource {
    pub fn new(
        credentials: Option<(String, String)>,
        max_bytes: usize,
    ) -> Result<Self, StockbotError> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| StockbotError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            credentials,
            max_bytes,
        })
    }

    /// Uses basic auth only when both the account SID and auth token are set.
    pub fn from_config(config: &TwilioConfig) -> Result<Self, StockbotError> {
        let credentials = config
            .account_sid
            .clone()
            .zip(config.auth_token.clone())
            .filter(|(sid, token)| !sid.is_empty() && !token.is_empty());
        Self::new(credentials, config.max_media_bytes)
    }

    fn too_large(&self, size: usize) -> StockbotError {
        StockbotError::channel(format!(
            "media is {size} bytes, limit is {}",
            self.max_bytes
        ))
    }
}

#[async_trait]
impl PluginAdapter for TwilioMediaSource {
    fn name(&self) -> &str {
        "twilio-media"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, StockbotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl MediaSource for TwilioMediaSource {
    async fn fetch(&self, media: &MediaRef) -> Result<Attachment, StockbotError> {
        let mut request = self.client.get(&media.url);
        if let Some((sid, token)) = &self.credentials {
            request = request.basic_auth(sid, Some(token));
        }

        let mut response = request.send().await.map_err(|e| StockbotError::Channel {
            message: format!("media request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockbotError::channel(format!(
                "media download returned {status}"
            )));
        }
        if let Some(len) = response.content_length()
            && len > self.max_bytes as u64
        {
            return Err(self.too_large(len as usize));
        }

        let header_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| StockbotError::Channel {
            message: format!("media body read failed: {e}"),
            source: Some(Box::new(e)),
        })? {
            if data.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(data.len() + chunk.len()));
            }
            data.extend_from_slice(&chunk);
        }

        let mime_type = if media.content_type.is_empty() {
            header_type.unwrap_or_else(|| "application/octet-stream".to_string())
        } else {
            media.content_type.clone()
        };

        debug!(size = data.len(), mime_type = %mime_type, "media downloaded");
        Ok(Attachment { data, mime_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn media(server: &MockServer, content_type: &str) -> MediaRef {
        MediaRef {
            url: format!("{}/Media/ME1", server.uri()),
            content_type: content_type.to_string(),
        }
    }

    #[tokio::test]
    async fn downloads_with_basic_auth() {
        let server = MockServer::start().await;
        // base64("AC123:secret")
        Mock::given(method("GET"))
            .and(path("/Media/ME1"))
            .and(header("authorization", "Basic QUMxMjM6c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
            .expect(1)
            .mount(&server)
            .await;

        let source =
            TwilioMediaSource::new(Some(("AC123".into(), "secret".into())), 1024).unwrap();
        let attachment = source.fetch(&media(&server, "image/jpeg")).await.unwrap();
        assert_eq!(attachment.data, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(attachment.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn non_success_status_is_channel_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = TwilioMediaSource::new(None, 1024).unwrap();
        let err = source.fetch(&media(&server, "audio/ogg")).await.unwrap_err();
        assert!(matches!(err, StockbotError::Channel { .. }));
    }

    #[tokio::test]
    async fn oversized_media_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
            .mount(&server)
            .await;

        let source = TwilioMediaSource::new(None, 16).unwrap();
        let err = source.fetch(&media(&server, "image/png")).await.unwrap_err();
        assert!(err.to_string().contains("limit is 16"));
    }

    #[tokio::test]
    async fn falls_back_to_response_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(vec![1, 2], "audio/ogg"),
            )
            .mount(&server)
            .await;

        let source = TwilioMediaSource::new(None, 1024).unwrap();
        let attachment = source.fetch(&media(&server, "")).await.unwrap();
        assert_eq!(attachment.mime_type, "audio/ogg");
    }

    #[test]
    fn credentials_need_both_values() {
        let mut config = TwilioConfig {
            account_sid: Some("AC1".into()),
            ..Default::default()
        };
        assert!(TwilioMediaSource::from_config(&config).unwrap().credentials.is_none());
        config.auth_token = Some("t".into());
        assert!(TwilioMediaSource::from_config(&config).unwrap().credentials.is_some());
    }
}
