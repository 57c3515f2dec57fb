// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the stockbot assistant.

use thiserror::Error;

/// The primary error type used across all stockbot adapter traits and core operations.
#[derive(Debug, Error)]
pub enum StockbotError {
    /// Configuration errors (missing credentials, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Session store errors (connection failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging provider errors (media download, malformed webhook).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// LLM provider errors (API failure, quota, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Inventory file could not be read or parsed.
    #[error("inventory error: {message}")]
    Inventory {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No model from the preference list answered the liveness probe.
    #[error("no model endpoint is available")]
    NoModelAvailable,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StockbotError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        StockbotError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a channel error without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        StockbotError::Channel {
            message: message.into(),
            source: None,
        }
    }
}
