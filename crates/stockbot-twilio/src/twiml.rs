// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TwiML messaging reply envelope.

use quick_xml::escape::{escape, unescape};

pub const TWIML_CONTENT_TYPE: &str = "application/xml";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Wraps `body` in `<Response><Message>`, escaping XML metacharacters.
pub fn render_message(body: &str) -> String {
    format!("{XML_DECL}<Response><Message>{}</Message></Response>", escape(body))
}

/// Extracts and unescapes the text of the first `<Message>` element.
pub fn message_text(twiml: &str) -> Option<String> {
    let start = twiml.find("<Message>")? + "<Message>".len();
    let end = start + twiml[start..].find("</Message>")?;
    unescape(&twiml[start..end]).ok().map(|s| s.into_owned())
}
