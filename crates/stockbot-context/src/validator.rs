// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deny-list screening of inbound text.

use stockbot_config::StockbotConfig;
use stockbot_core::types::ValidationResult;

/// Rejects text containing any deny-listed term, case-insensitively.
#[derive(Debug, Clone)]
pub struct QueryValidator {
    banned: Vec<String>,
    redirect: String,
}

impl QueryValidator {
    pub fn new<I, S>(banned_words: I, redirect: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let banned = banned_words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            banned,
            redirect: redirect.into(),
        }
    }

    pub fn from_config(config: &StockbotConfig) -> Self {
        Self::new(&config.policy.banned_words, config.messages.off_topic.clone())
    }

    /// Substring match against the lowercased text. Which term matched is
    /// not reported.
    pub fn validate(&self, text: &str) -> ValidationResult {
        let lowered = text.to_lowercase();
        if self.banned.iter().any(|w| lowered.contains(w.as_str())) {
            ValidationResult::rejected(self.redirect.clone())
        } else {
            ValidationResult::allowed()
        }
    }
}
