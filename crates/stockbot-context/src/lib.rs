// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Everything that happens to a user's text before it reaches the model.
//!
//! - **Policy**: the fixed behavioural instructions, loaded once at startup
//! - **Validator**: deny-list screening of inbound text
//! - **Composer**: merges policy, the full inventory and the query into one prompt

pub mod composer;
pub mod policy;
pub mod validator;

pub use composer::PromptComposer;
pub use policy::SystemPolicy;
pub use validator::QueryValidator;
