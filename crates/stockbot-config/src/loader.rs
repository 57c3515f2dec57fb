// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./stockbot.toml` > `~/.config/stockbot/stockbot.toml` > `/etc/stockbot/stockbot.toml`
//! with overrides from the conventional provider variables (`GEMINI_API_KEY`,
//! `TWILIO_ACCOUNT_SID`, ...) and then `STOCKBOT_`-prefixed variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::StockbotConfig;

/// Config sections addressable from `STOCKBOT_*` variables.
const SECTIONS: &[&str] = &[
    "agent",
    "messages",
    "policy",
    "gemini",
    "twilio",
    "cache",
    "inventory",
    "server",
];

/// Conventional variable names honoured without the `STOCKBOT_` prefix.
const WELL_KNOWN_ENV: &[(&str, &str)] = &[
    ("GEMINI_API_KEY", "gemini.api_key"),
    ("TWILIO_ACCOUNT_SID", "twilio.account_sid"),
    ("TWILIO_AUTH_TOKEN", "twilio.auth_token"),
    ("TWILIO_WHATSAPP_NUMBER", "twilio.whatsapp_number"),
    ("REDIS_URL", "cache.url"),
    ("PORT", "server.port"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/stockbot/stockbot.toml` (system-wide)
/// 3. `~/.config/stockbot/stockbot.toml` (user XDG config)
/// 4. `./stockbot.toml` (local directory)
/// 5. Well-known provider variables
/// 6. `STOCKBOT_*` environment variables
pub fn load_config() -> Result<StockbotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StockbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StockbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StockbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StockbotConfig::default()))
        .merge(Toml::file(path))
        .merge(well_known_env())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(StockbotConfig::default()))
        .merge(Toml::file("/etc/stockbot/stockbot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("stockbot/stockbot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("stockbot.toml"))
        .merge(well_known_env())
        .merge(env_provider())
}

/// Provider for the unprefixed variables deployment platforms usually set.
fn well_known_env() -> Env {
    let names: Vec<&str> = WELL_KNOWN_ENV.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        WELL_KNOWN_ENV
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| (*path).into())
            .unwrap_or_else(|| key.as_str().into())
    })
}

/// Create the `STOCKBOT_` environment provider with explicit section mapping.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `STOCKBOT_GEMINI_API_KEY` maps to `gemini.api_key`, not `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("STOCKBOT_").map(|key| map_section_key(key.as_str()).into())
}

fn map_section_key(key: &str) -> String {
    let lower = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = lower
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    lower
}
