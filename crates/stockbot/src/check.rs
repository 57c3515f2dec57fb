// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockbot check` command implementation.
//!
//! Reports whether the loaded configuration is ready to serve: credentials
//! present, inventory readable and the session cache reachable.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use stockbot_config::StockbotConfig;
use stockbot_core::InventorySource;
use stockbot_inventory::CsvInventory;
use stockbot_session::connect_store;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Runs every check and prints a report. Returns `false` if any check failed.
pub async fn run_check(config: &StockbotConfig, plain: bool) -> bool {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_credentials(config),
        check_signature(config),
        check_inventory(config).await,
        check_cache(config).await,
    ];

    println!();
    println!("  stockbot check");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;
    for result in &results {
        match result.status {
            CheckStatus::Warn => warn_count += 1,
            CheckStatus::Fail => fail_count += 1,
            CheckStatus::Pass => {}
        }
        println!("{}", format_line(result, use_color));
    }

    println!();
    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    fail_count == 0
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<20} {} ({duration_ms}ms)", result.name, result.message)
    }
}

fn check_credentials(config: &StockbotConfig) -> CheckResult {
    let start = Instant::now();
    match stockbot_config::require_credentials(config) {
        Ok(()) => CheckResult::new("Credentials", CheckStatus::Pass, "present", start),
        Err(errors) => {
            let missing: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            CheckResult::new("Credentials", CheckStatus::Fail, missing.join("; "), start)
        }
    }
}

fn check_signature(config: &StockbotConfig) -> CheckResult {
    let start = Instant::now();
    let twilio = &config.twilio;
    if twilio.validate_signature {
        CheckResult::new("Webhook signature", CheckStatus::Pass, "validated", start)
    } else if twilio.auth_token.is_none() {
        CheckResult::new(
            "Webhook signature",
            CheckStatus::Warn,
            "no auth token; media downloads are unauthenticated",
            start,
        )
    } else {
        CheckResult::new("Webhook signature", CheckStatus::Warn, "not validated", start)
    }
}

async fn check_inventory(config: &StockbotConfig) -> CheckResult {
    let start = Instant::now();
    let source = CsvInventory::new(&config.inventory.path);
    match source.load().await {
        Ok(table) if table.is_empty() => CheckResult::new(
            "Inventory",
            CheckStatus::Warn,
            format!("{} has no rows", config.inventory.path),
            start,
        ),
        Ok(table) => {
            let records = table.records();
            let units: u64 = records.iter().map(|r| u64::from(r.stock)).sum();
            let malformed = table.len() - records.len();
            if malformed > 0 {
                CheckResult::new(
                    "Inventory",
                    CheckStatus::Warn,
                    format!(
                        "{} products in {}, {malformed} with missing or non-numeric ID/Precio/Stock",
                        table.len(),
                        config.inventory.path
                    ),
                    start,
                )
            } else {
                CheckResult::new(
                    "Inventory",
                    CheckStatus::Pass,
                    format!(
                        "{} products in {} ({units} units in stock)",
                        table.len(),
                        config.inventory.path
                    ),
                    start,
                )
            }
        }
        Err(e) => CheckResult::new(
            "Inventory",
            CheckStatus::Warn,
            format!("{e} (run `stockbot init`)"),
            start,
        ),
    }
}

async fn check_cache(config: &StockbotConfig) -> CheckResult {
    let start = Instant::now();
    if config.cache.url.is_none() {
        return CheckResult::new(
            "Session cache",
            CheckStatus::Warn,
            "not configured; conversations are stateless",
            start,
        );
    }
    match connect_store(&config.cache).await {
        Some(store) => CheckResult::new(
            "Session cache",
            CheckStatus::Pass,
            format!("{} reachable", store.name()),
            start,
        ),
        None => CheckResult::new(
            "Session cache",
            CheckStatus::Warn,
            "unreachable; conversations are stateless",
            start,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_fail() {
        let result = check_credentials(&StockbotConfig::default());
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("gemini.api_key"));
    }

    #[test]
    fn present_credentials_pass() {
        let mut config = StockbotConfig::default();
        config.gemini.api_key = Some("k".into());
        config.twilio.account_sid = Some("AC1".into());
        assert_eq!(check_credentials(&config).status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn missing_inventory_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StockbotConfig::default();
        config.inventory.path = dir.path().join("nope.csv").to_string_lossy().into_owned();
        assert_eq!(check_inventory(&config).await.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn sample_inventory_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        std::fs::write(&path, stockbot_inventory::SAMPLE_INVENTORY_CSV).unwrap();
        let mut config = StockbotConfig::default();
        config.inventory.path = path.to_string_lossy().into_owned();

        let result = check_inventory(&config).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.starts_with("10 products"));
        assert!(result.message.ends_with("units in stock)"));
    }

    #[tokio::test]
    async fn malformed_rows_warn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        std::fs::write(
            &path,
            "ID,Producto,Categoria,Precio,Stock,Proveedor,Descripcion\n\
             1,Mouse Logitech,Accesorios,25.99,40,Logitech,Inalambrico\n\
             2,Teclado,Accesorios,consultar,10,Genius,Mecanico\n",
        )
        .unwrap();
        let mut config = StockbotConfig::default();
        config.inventory.path = path.to_string_lossy().into_owned();

        let result = check_inventory(&config).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.starts_with("2 products"));
        assert!(result.message.contains("1 with missing"));
    }

    #[tokio::test]
    async fn memory_cache_passes_and_absent_cache_warns() {
        let mut config = StockbotConfig::default();
        assert_eq!(check_cache(&config).await.status, CheckStatus::Warn);

        config.cache.url = Some("memory://".into());
        let result = check_cache(&config).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.message, "memory reachable");
    }

    #[test]
    fn plain_format_has_tags() {
        let result = CheckResult {
            name: "Inventory".into(),
            status: CheckStatus::Warn,
            message: "empty".into(),
            duration: Duration::from_millis(3),
        };
        assert_eq!(
            format_line(&result, false),
            "    [WARN] Inventory            empty (3ms)"
        );
    }
}
