// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the stockbot assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level stockbot configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StockbotConfig {
    /// Assistant identity and response shaping.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Canned user-facing replies.
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Deny-list and greeting keywords.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Google Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Twilio WhatsApp settings.
    #[serde(default)]
    pub twilio: TwilioConfig,

    /// Session cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Inventory file settings.
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Assistant identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system policy. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a text file containing the system policy.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Generated replies longer than this many characters are cut.
    #[serde(default = "default_max_response_chars")]
    pub max_response_chars: usize,

    /// Number of most recent turns kept in a stored session.
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
            max_response_chars: default_max_response_chars(),
            max_history_turns: default_max_history_turns(),
        }
    }
}

fn default_agent_name() -> String {
    "stockbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_response_chars() -> usize {
    500
}

fn default_max_history_turns() -> usize {
    20
}

/// Canned replies sent without consulting the model.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagesConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Redirect sent when a query hits the deny-list.
    #[serde(default = "default_off_topic")]
    pub off_topic: String,

    #[serde(default = "default_general_error")]
    pub general_error: String,

    #[serde(default = "default_no_information")]
    pub no_information: String,

    #[serde(default = "default_unsupported_media")]
    pub unsupported_media: String,

    #[serde(default = "default_media_download_error")]
    pub media_download_error: String,

    #[serde(default = "default_media_error")]
    pub media_error: String,

    /// Last-resort reply when dispatch itself fails.
    #[serde(default = "default_apology")]
    pub apology: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            off_topic: default_off_topic(),
            general_error: default_general_error(),
            no_information: default_no_information(),
            unsupported_media: default_unsupported_media(),
            media_download_error: default_media_download_error(),
            media_error: default_media_error(),
            apology: default_apology(),
        }
    }
}

fn default_greeting() -> String {
    "¡Hola! 👋 Soy tu asistente de inventario. Puedes preguntarme sobre productos, precios, stock, o enviarme fotos/audios para análisis. ¿En qué puedo ayudarte?".to_string()
}

fn default_off_topic() -> String {
    "🤖 Solo puedo ayudarte con consultas sobre el inventario de productos. ¿Hay algo específico que te gustaría saber sobre nuestros productos?".to_string()
}

fn default_general_error() -> String {
    "❌ Lo siento, ocurrió un error. Intenta de nuevo o reformula tu pregunta.".to_string()
}

fn default_no_information() -> String {
    "❌ No hay información disponible sobre esa consulta en el inventario.".to_string()
}

fn default_unsupported_media() -> String {
    "❌ Tipo de archivo no soportado. Envía una imagen o audio.".to_string()
}

fn default_media_download_error() -> String {
    "Error al descargar el archivo.".to_string()
}

fn default_media_error() -> String {
    "Error al procesar el archivo. Intenta de nuevo.".to_string()
}

fn default_apology() -> String {
    "Lo siento, ocurrió un error. Intenta de nuevo.".to_string()
}

/// Query policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Case-insensitive substrings that cause a query to be redirected.
    #[serde(default = "default_banned_words")]
    pub banned_words: Vec<String>,

    /// Messages that are answered with the canned greeting (exact match, case-insensitive).
    #[serde(default = "default_greeting_keywords")]
    pub greeting_keywords: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            banned_words: default_banned_words(),
            greeting_keywords: default_greeting_keywords(),
        }
    }
}

fn default_banned_words() -> Vec<String> {
    [
        "comprar",
        "vender",
        "transacción",
        "pago",
        "dinero",
        "tarjeta",
        "contraseña",
        "password",
        "usuario",
        "login",
        "acceso",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_greeting_keywords() -> Vec<String> {
    ["hola", "hi", "hello", "buenos días"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Google Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. Required by `serve`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Models tried in order during endpoint resolution.
    #[serde(default = "default_preferred_models")]
    pub preferred_models: Vec<String>,

    /// Prompt used for the liveness probe.
    #[serde(default = "default_probe_prompt")]
    pub probe_prompt: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            preferred_models: default_preferred_models(),
            probe_prompt: default_probe_prompt(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_preferred_models() -> Vec<String> {
    [
        "gemini-1.5-flash",
        "gemini-1.5-flash-001",
        "gemini-1.5-flash-002",
        "gemini-1.5-pro",
        "gemini-pro",
        "gemini-1.0-pro",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_probe_prompt() -> String {
    "test".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Twilio WhatsApp configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwilioConfig {
    /// Account SID. Required by `serve`.
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Auth token, used for media download and signature validation.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Sender number, e.g. `whatsapp:+14155238886`.
    #[serde(default)]
    pub whatsapp_number: Option<String>,

    /// Reject webhook calls whose `X-Twilio-Signature` does not verify.
    #[serde(default)]
    pub validate_signature: bool,

    /// Externally visible webhook URL, needed for signature validation.
    #[serde(default)]
    pub public_url: Option<String>,

    /// Largest media download accepted, in bytes.
    #[serde(default = "default_max_media_bytes")]
    pub max_media_bytes: usize,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            whatsapp_number: None,
            validate_signature: false,
            public_url: None,
            max_media_bytes: default_max_media_bytes(),
        }
    }
}

fn default_max_media_bytes() -> usize {
    20 * 1024 * 1024
}

/// Session cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// `redis://…` connection string, or `memory://` for an in-process store.
    /// `None` disables session persistence.
    #[serde(default)]
    pub url: Option<String>,

    /// Session expiry in seconds, reset on every write.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Key prefix for stored sessions.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: None,
            ttl_secs: default_ttl_secs(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_key_prefix() -> String {
    "chat_session_".to_string()
}

/// Inventory file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    /// Path to the CSV inventory file.
    #[serde(default = "default_inventory_path")]
    pub path: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            path: default_inventory_path(),
        }
    }
}

fn default_inventory_path() -> String {
    "inventario.csv".to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}
