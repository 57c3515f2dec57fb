// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockbot serve` command implementation.
//!
//! Wires the Gemini backend, session cache, inventory and Twilio media
//! source into a dispatcher and serves the webhook until a shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use stockbot_agent::{Dispatcher, ModelGateway};
use stockbot_config::StockbotConfig;
use stockbot_context::{PromptComposer, SystemPolicy};
use stockbot_core::StockbotError;
use stockbot_gateway::{AppState, start_server};
use stockbot_gemini::GeminiBackend;
use stockbot_inventory::CsvInventory;
use stockbot_session::{SessionManager, connect_store};
use stockbot_twilio::TwilioMediaSource;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the server. Credentials must already have been checked.
pub async fn run_serve(config: StockbotConfig) -> Result<(), StockbotError> {
    init_tracing(&config.agent.log_level);

    info!(
        agent_name = config.agent.name.as_str(),
        inventory = config.inventory.path.as_str(),
        "starting stockbot"
    );

    let backend = Arc::new(GeminiBackend::from_config(&config)?);
    let gateway = Arc::new(ModelGateway::from_config(backend, &config));

    let store = connect_store(&config.cache).await;
    let sessions = SessionManager::new(
        store,
        Duration::from_secs(config.cache.ttl_secs),
        config.agent.max_history_turns,
    );
    info!(backend = sessions.backend_name(), "session store ready");

    let inventory = Arc::new(CsvInventory::new(&config.inventory.path));
    let media = Arc::new(TwilioMediaSource::from_config(&config.twilio)?);
    let composer = PromptComposer::new(SystemPolicy::load(&config.agent).await);

    let dispatcher = Arc::new(Dispatcher::from_config(
        &config,
        composer,
        sessions,
        gateway.clone(),
        inventory,
        media,
    ));

    match gateway.resolve_endpoint().await {
        Some(model) => info!(model = model.as_str(), "model verified at startup"),
        None => {
            warn!("no Gemini model is available at startup, continuing");
            warn!("endpoint resolution will be retried on the first message");
        }
    }

    let cancel = shutdown::install_signal_handler();
    let state = AppState::new(dispatcher, &config);
    start_server(&config, state, cancel).await?;

    info!("stockbot shut down cleanly");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stockbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
