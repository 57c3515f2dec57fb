// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook form fields.

use stockbot_core::types::{InboundMessage, MediaRef};

pub const FIELD_BODY: &str = "Body";
pub const FIELD_FROM: &str = "From";
pub const FIELD_MEDIA_URL: &str = "MediaUrl0";
pub const FIELD_MEDIA_TYPE: &str = "MediaContentType0";

fn field<'a>(params: &'a [(String, String)], name: &str) -> &'a str {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

/// Builds an [`InboundMessage`] from decoded form pairs.
///
/// Missing fields read as empty. Only the first attachment is considered,
/// and an empty `MediaUrl0` means there is none.
pub fn parse_inbound(params: &[(String, String)]) -> InboundMessage {
    let url = field(params, FIELD_MEDIA_URL).trim();
    let media = (!url.is_empty()).then(|| MediaRef {
        url: url.to_string(),
        content_type: field(params, FIELD_MEDIA_TYPE).trim().to_string(),
    });

    InboundMessage {
        sender_id: field(params, FIELD_FROM).to_string(),
        body: field(params, FIELD_BODY).to_string(),
        media,
    }
}
