// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use stockbot_agent::Dispatcher;
use stockbot_config::StockbotConfig;
use stockbot_core::StockbotError;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Credentials for checking `X-Twilio-Signature` on the webhook.
#[derive(Clone)]
pub struct SignatureCheck {
    pub auth_token: String,
    /// URL Twilio was configured to call, exactly as signed.
    pub public_url: String,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// `None` disables signature validation.
    pub signature: Option<SignatureCheck>,
    /// Length of the configured Gemini API key, reported by `/debug`.
    pub api_key_length: usize,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>, config: &StockbotConfig) -> Self {
        let twilio = &config.twilio;
        let signature = if twilio.validate_signature {
            twilio
                .auth_token
                .clone()
                .zip(twilio.public_url.clone())
                .map(|(auth_token, public_url)| SignatureCheck {
                    auth_token,
                    public_url,
                })
        } else {
            None
        };
        Self {
            dispatcher,
            signature,
            api_key_length: config
                .gemini
                .api_key
                .as_deref()
                .map_or(0, |k| k.chars().count()),
        }
    }
}

/// Builds the router:
/// - POST /whatsapp
/// - GET /health
/// - GET /debug
/// - GET /
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/whatsapp", post(handlers::post_whatsapp))
        .route("/health", get(handlers::get_health))
        .route("/debug", get(handlers::get_debug))
        .route("/", get(handlers::get_home))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `host:port` and serves until `cancel` fires.
pub async fn start_server(
    config: &StockbotConfig,
    state: AppState,
    cancel: CancellationToken,
) -> Result<(), StockbotError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StockbotError::Channel {
            message: format!("failed to bind server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("server listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| StockbotError::Channel {
            message: format!("server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("server stopped");
    Ok(())
}
