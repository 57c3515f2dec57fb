// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Twilio WhatsApp wire format for the stockbot assistant.
//!
//! Covers the inbound webhook form, the TwiML reply envelope, request
//! signature validation and authenticated media download.

pub mod media;
pub mod signature;
pub mod twiml;
pub mod webhook;

pub use media::TwilioMediaSource;
pub use signature::{compute_signature, verify_signature};
pub use twiml::{message_text, render_message, TWIML_CONTENT_TYPE};
pub use webhook::parse_inbound;
