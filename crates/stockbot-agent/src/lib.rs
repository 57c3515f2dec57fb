// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message handling pipeline for the stockbot assistant.
//!
//! The [`Dispatcher`] is the central coordinator that:
//! - Classifies each inbound message (greeting, query, media, unsupported)
//! - Screens text through the deny-list validator
//! - Composes prompts against the current inventory
//! - Calls the model through the [`ModelGateway`] with session history

pub mod dispatcher;
pub mod model_gateway;

pub use dispatcher::{Dispatcher, Route, classify};
pub use model_gateway::{ModelGateway, truncate_response};
