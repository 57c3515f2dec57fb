// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the stockbot pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter plugged into the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Model,
    SessionStore,
    Inventory,
    Channel,
}

// --- Conversation types ---

/// Author of a single conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One entry of a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

/// Per-user conversation state, keyed by the sender's phone number.
///
/// Always written wholesale; there is no append contract with the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub user_id: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl ConversationSession {
    /// Creates an empty session for a user seen for the first time.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            history: Vec::new(),
        }
    }

    /// Appends a completed user/model exchange.
    pub fn record_exchange(&mut self, user: impl Into<String>, model: impl Into<String>) {
        self.history.push(ChatTurn::user(user));
        self.history.push(ChatTurn::model(model));
    }

    /// Drops the oldest exchanges so at most `max_turns` turns remain.
    ///
    /// The cap is rounded down to whole user/model pairs, so the kept
    /// history always opens with a user turn.
    pub fn truncate_history(&mut self, max_turns: usize) {
        let max_turns = max_turns - max_turns % 2;
        if self.history.len() > max_turns {
            let excess = self.history.len() - max_turns;
            self.history.drain(..excess);
        }
    }
}

/// Outcome of running inbound text through the deny-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_allowed: bool,
    pub rejection_message: Option<String>,
}

impl ValidationResult {
    pub fn allowed() -> Self {
        Self {
            is_allowed: true,
            rejection_message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_allowed: false,
            rejection_message: Some(message.into()),
        }
    }
}

// --- Inventory types ---

/// A typed view of one inventory row, built by [`InventoryTable::records`].
///
/// Columns are matched by the Spanish spreadsheet headers, with English
/// names accepted as well.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRecord {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub supplier: String,
    pub description: String,
}

/// The whole inventory as loaded for a single request: every column, every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InventoryTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Typed view of the rows. Rows missing a product field, or whose
    /// numeric cells do not parse, are skipped.
    pub fn records(&self) -> Vec<InventoryRecord> {
        self.rows
            .iter()
            .filter_map(|row| self.record_from_row(row))
            .collect()
    }

    fn cell<'a>(&self, row: &'a [String], names: &[&str]) -> Option<&'a str> {
        let idx = self
            .columns
            .iter()
            .position(|c| names.iter().any(|n| c.trim().eq_ignore_ascii_case(n)))?;
        row.get(idx).map(|s| s.trim())
    }

    fn record_from_row(&self, row: &[String]) -> Option<InventoryRecord> {
        Some(InventoryRecord {
            id: self.cell(row, &["ID", "id"])?.parse().ok()?,
            name: self.cell(row, &["Producto", "name"])?.to_string(),
            category: self.cell(row, &["Categoria", "category"])?.to_string(),
            price: self.cell(row, &["Precio", "price"])?.parse().ok()?,
            stock: self.cell(row, &["Stock"])?.parse().ok()?,
            supplier: self.cell(row, &["Proveedor", "supplier"])?.to_string(),
            description: self
                .cell(row, &["Descripcion", "description"])
                .unwrap_or_default()
                .to_string(),
        })
    }
}

// --- Inbound message types ---

/// Media attached to an inbound message, as announced by the messaging provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub url: String,
    pub content_type: String,
}

/// A provider-neutral inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender_id: String,
    pub body: String,
    pub media: Option<MediaRef>,
}

/// Media modalities the model is asked to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MediaKind {
    #[strum(serialize = "image")]
    Image,
    #[strum(serialize = "audio")]
    Audio,
}

impl MediaKind {
    /// Classifies a MIME type; `None` for anything that is neither image nor audio.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let lower = content_type.to_ascii_lowercase();
        if lower.contains("image") {
            Some(MediaKind::Image)
        } else if lower.contains("audio") {
            Some(MediaKind::Audio)
        } else {
            None
        }
    }

    /// File extension used when staging the attachment to disk.
    pub fn default_extension(&self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Audio => "wav",
        }
    }
}

/// Downloaded media bytes.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub mime_type: String,
}

// --- Model types ---

/// A file that has been handed to the model provider's upload mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub uri: String,
    pub mime_type: String,
}

/// A single generation call against a resolved model endpoint.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub history: Vec<ChatTurn>,
    pub prompt: String,
    pub file: Option<UploadedFile>,
}

/// Metadata for a model advertised by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: String,
    pub supported_methods: Vec<String>,
}
