// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles POST /whatsapp, GET /health, GET /debug and GET /.

use axum::{
    Json,
    extract::{Form, State, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use stockbot_core::types::{GenerateRequest, ModelInfo};
use stockbot_twilio::{TWIML_CONTENT_TYPE, parse_inbound, render_message, verify_signature};
use stockbot_twilio::signature::SIGNATURE_HEADER;
use tracing::{info, warn};

use crate::server::AppState;

/// Prompt sent by `/debug` to the first preferred model.
const DEBUG_PROMPT: &str = "Hola, ¿funcionas?";
const DEBUG_RESPONSE_CHARS: usize = 100;

const HOME_PAGE: &str = r#"<h1>🤖 Agente de IA para WhatsApp</h1>
<p>Servidor funcionando correctamente.</p>
<p>Webhook configurado en: /whatsapp</p>
<p>Estado: <a href="/health">Verificar salud</a></p>
<p>Debug: <a href="/debug">Probar API de Gemini</a></p>
"#;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    /// Resolved model id, or `"none"`.
    pub gemini_model: String,
    pub model_available: bool,
    pub available_models: Vec<String>,
    /// `"redis"`, `"memory"` or `"disabled"`.
    pub session_store: String,
}

#[derive(Debug, Serialize)]
pub struct DebugModel {
    pub name: String,
    pub display_name: String,
    pub supported_methods: Vec<String>,
}

impl From<ModelInfo> for DebugModel {
    fn from(m: ModelInfo) -> Self {
        Self {
            name: m.name,
            display_name: m.display_name,
            supported_methods: m.supported_methods,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TestResult {
    Success {
        success: bool,
        response: String,
        model_used: String,
    },
    Failure {
        success: bool,
        error: String,
        model_used: String,
    },
}

/// Response body for GET /debug.
#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub api_key_configured: bool,
    pub api_key_length: usize,
    pub available_models: Vec<DebugModel>,
    pub test_result: Option<TestResult>,
    pub timestamp: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: String,
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// POST /whatsapp
///
/// Always answers 200 with a TwiML envelope, unless signature validation is
/// enabled and the request does not verify.
pub async fn post_whatsapp(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let params = match form {
        Ok(Form(params)) => params,
        Err(e) => {
            warn!(error = %e, "undecodable webhook body");
            Vec::new()
        }
    };

    if let Some(check) = &state.signature {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !verify_signature(&check.auth_token, &check.public_url, &params, provided) {
            warn!("webhook signature mismatch");
            return StatusCode::FORBIDDEN.into_response();
        }
    }

    let message = parse_inbound(&params);
    info!(
        sender = %message.sender_id,
        has_media = message.media.is_some(),
        "inbound message"
    );
    let reply = state.dispatcher.dispatch(message).await;

    (
        [(header::CONTENT_TYPE, TWIML_CONTENT_TYPE)],
        render_message(&reply),
    )
        .into_response()
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let gateway = state.dispatcher.gateway();
    let endpoint = gateway.resolve_endpoint().await;
    let available_models = gateway
        .available_models()
        .await
        .into_iter()
        .map(|m| m.name)
        .collect();

    Json(HealthResponse {
        status: if endpoint.is_some() { "ok" } else { "error" },
        timestamp: now(),
        model_available: endpoint.is_some(),
        gemini_model: endpoint.unwrap_or_else(|| "none".to_string()),
        available_models,
        session_store: state.dispatcher.sessions().backend_name().to_string(),
    })
}

/// GET /debug
///
/// Lists models and sends a fixed prompt straight to the first preferred
/// model, bypassing endpoint resolution.
pub async fn get_debug(State(state): State<AppState>) -> Response {
    if state.api_key_length == 0 {
        return Json(ErrorResponse {
            error: "GEMINI_API_KEY no configurada".to_string(),
            timestamp: now(),
        })
        .into_response();
    }

    let gateway = state.dispatcher.gateway();
    let available_models = gateway
        .available_models()
        .await
        .into_iter()
        .map(DebugModel::from)
        .collect();

    let test_result = match gateway.preferred_models().first() {
        Some(model) => {
            let request = GenerateRequest {
                model: model.clone(),
                history: Vec::new(),
                prompt: DEBUG_PROMPT.to_string(),
                file: None,
            };
            Some(match gateway.backend().generate(request).await {
                Ok(text) => TestResult::Success {
                    success: true,
                    response: text.chars().take(DEBUG_RESPONSE_CHARS).collect(),
                    model_used: model.clone(),
                },
                Err(e) => TestResult::Failure {
                    success: false,
                    error: e.to_string(),
                    model_used: model.clone(),
                },
            })
        }
        None => None,
    };

    Json(DebugResponse {
        api_key_configured: true,
        api_key_length: state.api_key_length,
        available_models,
        test_result,
        timestamp: now(),
    })
    .into_response()
}

/// GET /
pub async fn get_home() -> Html<&'static str> {
    Html(HOME_PAGE)
}
