// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: non-zero limits,
//! recognised cache URL schemes, a usable bind host.

use crate::diagnostic::ConfigError;
use crate::model::StockbotConfig;

/// Schemes accepted for `cache.url`.
const CACHE_SCHEMES: &[&str] = &["redis://", "rediss://", "memory://"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &StockbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_ip && !is_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.port == 0 {
        fail("server.port must be non-zero".to_string());
    }

    if config.agent.max_response_chars == 0 {
        fail("agent.max_response_chars must be at least 1".to_string());
    }

    let turns = config.agent.max_history_turns;
    if turns == 0 || turns % 2 != 0 {
        fail(format!(
            "agent.max_history_turns must be a positive even number (user/model pairs), got {turns}"
        ));
    }

    if config.gemini.preferred_models.is_empty() {
        fail("gemini.preferred_models must list at least one model".to_string());
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be non-zero".to_string());
    }

    if config.cache.ttl_secs == 0 {
        fail("cache.ttl_secs must be non-zero".to_string());
    }

    if let Some(url) = &config.cache.url
        && !CACHE_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
    {
        fail(format!(
            "cache.url `{url}` must start with one of: {}",
            CACHE_SCHEMES.join(", ")
        ));
    }

    if config.inventory.path.trim().is_empty() {
        fail("inventory.path must not be empty".to_string());
    }

    if config.twilio.validate_signature {
        if config.twilio.auth_token.is_none() {
            fail("twilio.validate_signature requires twilio.auth_token".to_string());
        }
        if config.twilio.public_url.is_none() {
            fail("twilio.validate_signature requires twilio.public_url".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check the credentials the server cannot start without.
///
/// Kept apart from [`validate_config`] so `check` and tests can load a
/// config that has no secrets in it.
pub fn require_credentials(config: &StockbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.gemini.api_key.as_deref().is_none_or(str::is_empty) {
        errors.push(ConfigError::MissingCredential {
            key: "gemini.api_key".to_string(),
            env_var: "GEMINI_API_KEY".to_string(),
        });
    }

    if config.twilio.account_sid.as_deref().is_none_or(str::is_empty) {
        errors.push(ConfigError::MissingCredential {
            key: "twilio.account_sid".to_string(),
            env_var: "TWILIO_ACCOUNT_SID".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
