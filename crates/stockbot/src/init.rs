// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockbot init` command implementation.
//!
//! Writes a sample inventory and a commented config template. Existing
//! files are never overwritten.

use std::path::{Path, PathBuf};

use stockbot_core::StockbotError;
use stockbot_inventory::SAMPLE_INVENTORY_CSV;

const INVENTORY_FILE: &str = "inventario.csv";
const CONFIG_FILE: &str = "stockbot.toml";

const CONFIG_TEMPLATE: &str = r#"# stockbot configuration.
# Credentials are better supplied through the environment:
#   GEMINI_API_KEY, TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, REDIS_URL, PORT

[agent]
log_level = "info"
max_response_chars = 500
# system_prompt_file = "politica.txt"

[gemini]
preferred_models = [
    "gemini-1.5-flash",
    "gemini-1.5-flash-001",
    "gemini-1.5-flash-002",
    "gemini-1.5-pro",
    "gemini-pro",
    "gemini-1.0-pro",
]
timeout_secs = 60

[twilio]
validate_signature = false
# public_url = "https://example.com/whatsapp"

[cache]
# url = "redis://localhost:6379"
ttl_secs = 3600

[inventory]
path = "inventario.csv"

[server]
host = "0.0.0.0"
port = 5000
"#;

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    Skipped(PathBuf),
}

async fn write_if_absent(path: PathBuf, contents: &str) -> Result<InitOutcome, StockbotError> {
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Ok(InitOutcome::Skipped(path));
    }
    tokio::fs::write(&path, contents)
        .await
        .map_err(|e| StockbotError::Internal(format!("cannot write {}: {e}", path.display())))?;
    Ok(InitOutcome::Created(path))
}

/// Creates the sample files in `dir`, reporting each one.
pub async fn run_init(dir: &Path) -> Result<Vec<InitOutcome>, StockbotError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StockbotError::Internal(format!("cannot create {}: {e}", dir.display())))?;

    let outcomes = vec![
        write_if_absent(dir.join(INVENTORY_FILE), SAMPLE_INVENTORY_CSV).await?,
        write_if_absent(dir.join(CONFIG_FILE), CONFIG_TEMPLATE).await?,
    ];

    for outcome in &outcomes {
        match outcome {
            InitOutcome::Created(path) => println!("  created {}", path.display()),
            InitOutcome::Skipped(path) => println!("  exists  {} (left unchanged)", path.display()),
        }
    }
    Ok(outcomes)
}
