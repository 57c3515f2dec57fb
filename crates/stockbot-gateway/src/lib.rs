// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface of the stockbot assistant.
//!
//! Twilio posts each WhatsApp message to `/whatsapp` and receives the reply
//! inline as TwiML. `/health` and `/debug` report model availability.

pub mod handlers;
pub mod server;

pub use server::{AppState, SignatureCheck, router, start_server};
