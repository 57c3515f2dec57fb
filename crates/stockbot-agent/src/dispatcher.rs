// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message routing from an inbound webhook to a reply text.
//!
//! Every path ends in a user-facing string. Collaborator errors are logged
//! with detail and replaced by one of the configured canned messages; a
//! panic anywhere in the pipeline becomes the apology reply.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use stockbot_config::StockbotConfig;
use stockbot_config::model::MessagesConfig;
use stockbot_context::{PromptComposer, QueryValidator};
use stockbot_core::error::StockbotError;
use stockbot_core::traits::{InventorySource, MediaSource};
use stockbot_core::types::{InboundMessage, InventoryTable, MediaKind, MediaRef};
use stockbot_session::SessionManager;
use tracing::{debug, error, info, warn};

use crate::model_gateway::ModelGateway;

/// What an inbound message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Greeting,
    Query(String),
    Media { media: MediaRef, kind: MediaKind },
    Unsupported { content_type: String },
}

/// Classifies a message. Media wins over text; only a bare greeting keyword
/// gets the canned greeting, anything else (an empty body included) is a
/// query.
pub fn classify(message: &InboundMessage, greetings: &[String]) -> Route {
    if let Some(media) = &message.media {
        return match MediaKind::from_content_type(&media.content_type) {
            Some(kind) => Route::Media {
                media: media.clone(),
                kind,
            },
            None => Route::Unsupported {
                content_type: media.content_type.clone(),
            },
        };
    }

    let text = message.body.trim();
    let lowered = text.to_lowercase();
    if greetings.iter().any(|g| *g == lowered) {
        Route::Greeting
    } else {
        Route::Query(text.to_string())
    }
}

fn log_failure(stage: &'static str, err: &StockbotError) {
    match err {
        StockbotError::Provider { .. }
        | StockbotError::Timeout { .. }
        | StockbotError::NoModelAvailable => warn!(stage, error = %err, "model call failed"),
        StockbotError::Channel { .. } => warn!(stage, error = %err, "channel operation failed"),
        StockbotError::Storage { .. } => warn!(stage, error = %err, "session store failed"),
        StockbotError::Inventory { .. } => warn!(stage, error = %err, "inventory unavailable"),
        StockbotError::Config(_) | StockbotError::Internal(_) => {
            error!(stage, error = %err, "unexpected failure")
        }
    }
}

/// Turns inbound messages into reply texts.
pub struct Dispatcher {
    validator: QueryValidator,
    composer: PromptComposer,
    sessions: SessionManager,
    gateway: Arc<ModelGateway>,
    inventory: Arc<dyn InventorySource>,
    media: Arc<dyn MediaSource>,
    messages: MessagesConfig,
    greetings: Vec<String>,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        validator: QueryValidator,
        composer: PromptComposer,
        sessions: SessionManager,
        gateway: Arc<ModelGateway>,
        inventory: Arc<dyn InventorySource>,
        media: Arc<dyn MediaSource>,
        messages: MessagesConfig,
        greetings: Vec<String>,
    ) -> Self {
        let greetings = greetings
            .into_iter()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect();
        Self {
            validator,
            composer,
            sessions,
            gateway,
            inventory,
            media,
            messages,
            greetings,
        }
    }

    /// Wires a dispatcher from configuration and already-built collaborators.
    pub fn from_config(
        config: &StockbotConfig,
        composer: PromptComposer,
        sessions: SessionManager,
        gateway: Arc<ModelGateway>,
        inventory: Arc<dyn InventorySource>,
        media: Arc<dyn MediaSource>,
    ) -> Self {
        Self::new(
            QueryValidator::from_config(config),
            composer,
            sessions,
            gateway,
            inventory,
            media,
            config.messages.clone(),
            config.policy.greeting_keywords.clone(),
        )
    }

    pub fn gateway(&self) -> &Arc<ModelGateway> {
        &self.gateway
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Produces the reply text for one inbound message. Never fails.
    pub async fn dispatch(&self, message: InboundMessage) -> String {
        let sender = message.sender_id.clone();
        match AssertUnwindSafe(self.route(message)).catch_unwind().await {
            Ok(reply) => reply,
            Err(_) => {
                error!(sender = %sender, "dispatch panicked");
                self.messages.apology.clone()
            }
        }
    }

    async fn route(&self, message: InboundMessage) -> String {
        let route = classify(&message, &self.greetings);
        debug!(sender = %message.sender_id, route = ?route, "routing inbound message");
        match route {
            Route::Greeting => self.messages.greeting.clone(),
            Route::Query(text) => self.answer_query(&message.sender_id, &text).await,
            Route::Media { media, kind } => {
                let caption = message.body.trim();
                let caption = (!caption.is_empty()).then_some(caption);
                self.answer_media(&message.sender_id, &media, kind, caption)
                    .await
            }
            Route::Unsupported { content_type } => {
                info!(content_type = %content_type, "unsupported media type");
                self.messages.unsupported_media.clone()
            }
        }
    }

    async fn load_inventory(&self) -> InventoryTable {
        match self.inventory.load().await {
            Ok(table) => table,
            Err(e) => {
                log_failure("inventory", &e);
                InventoryTable::empty()
            }
        }
    }

    fn reject(&self, text: &str) -> Option<String> {
        let verdict = self.validator.validate(text);
        if verdict.is_allowed {
            return None;
        }
        debug!("query rejected by deny-list");
        Some(
            verdict
                .rejection_message
                .unwrap_or_else(|| self.messages.off_topic.clone()),
        )
    }

    async fn answer_query(&self, sender: &str, text: &str) -> String {
        if let Some(redirect) = self.reject(text) {
            return redirect;
        }

        let inventory = self.load_inventory().await;
        if inventory.is_empty() {
            return self.messages.no_information.clone();
        }
        let prompt = self.composer.compose_query(&inventory, text);

        let mut session = self.sessions.load(sender).await;
        let Some(endpoint) = self.gateway.resolve_endpoint().await else {
            return self.messages.general_error.clone();
        };

        match self
            .gateway
            .generate(&endpoint, prompt, session.history.clone())
            .await
        {
            Ok(reply) => {
                session.record_exchange(text, reply.as_str());
                self.sessions.save(session).await;
                reply
            }
            Err(e) => {
                log_failure("generate", &e);
                self.messages.general_error.clone()
            }
        }
    }

    async fn answer_media(
        &self,
        sender: &str,
        media: &MediaRef,
        kind: MediaKind,
        caption: Option<&str>,
    ) -> String {
        if let Some(redirect) = caption.and_then(|c| self.reject(c)) {
            return redirect;
        }

        let attachment = match self.media.fetch(media).await {
            Ok(attachment) => attachment,
            Err(e) => {
                log_failure("media_download", &e);
                return self.messages.media_download_error.clone();
            }
        };

        let inventory = self.load_inventory().await;
        let prompt = self.composer.compose_media(&inventory, kind, caption);

        let mut session = self.sessions.load(sender).await;
        let Some(endpoint) = self.gateway.resolve_endpoint().await else {
            return self.messages.general_error.clone();
        };

        match self
            .gateway
            .generate_with_attachment(&endpoint, prompt, session.history.clone(), &attachment, kind)
            .await
        {
            Ok(reply) => {
                let label = match caption {
                    Some(c) => format!("[{kind}] {c}"),
                    None => format!("[{kind}]"),
                };
                session.record_exchange(label, reply.as_str());
                self.sessions.save(session).await;
                reply
            }
            Err(e) => {
                log_failure("media_generate", &e);
                self.messages.media_error.clone()
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use stockbot_context::SystemPolicy;
    use stockbot_core::types::Role;
    use stockbot_session::MemorySessionStore;
    use stockbot_test_utils::{MockMedia, MockModel, StaticInventory};

    const SENDER: &str = "whatsapp:+5215550001";

    struct Fixture {
        dispatcher: Dispatcher,
        model: Arc<MockModel>,
        media: Arc<MockMedia>,
        sessions: SessionManager,
        messages: MessagesConfig,
    }

    fn fixture(model: MockModel, inventory: StaticInventory, media: MockMedia) -> Fixture {
        let config = StockbotConfig::default();
        let model = Arc::new(model);
        let media = Arc::new(media);
        let store: Arc<dyn stockbot_core::SessionStore> =
            Arc::new(MemorySessionStore::new("test"));
        let sessions = SessionManager::new(
            Some(store),
            std::time::Duration::from_secs(3600),
            config.agent.max_history_turns,
        );
        let gateway = Arc::new(ModelGateway::from_config(model.clone(), &config));
        let dispatcher = Dispatcher::from_config(
            &config,
            PromptComposer::new(SystemPolicy::default()),
            sessions.clone(),
            gateway,
            Arc::new(inventory),
            media.clone(),
        );
        Fixture {
            dispatcher,
            model,
            media,
            sessions,
            messages: config.messages,
        }
    }

    fn with_model(model: MockModel) -> Fixture {
        fixture(model, StaticInventory::sample(), MockMedia::new())
    }

    fn text(body: &str) -> InboundMessage {
        InboundMessage {
            sender_id: SENDER.into(),
            body: body.into(),
            media: None,
        }
    }

    fn with_media(body: &str, content_type: &str) -> InboundMessage {
        InboundMessage {
            sender_id: SENDER.into(),
            body: body.into(),
            media: Some(MediaRef {
                url: "https://api.twilio.com/Media/ME1".into(),
                content_type: content_type.into(),
            }),
        }
    }

    fn greetings() -> Vec<String> {
        StockbotConfig::default().policy.greeting_keywords
    }

    #[test]
    fn classify_routes() {
        assert_eq!(classify(&text("  hola "), &greetings()), Route::Greeting);
        assert_eq!(classify(&text(""), &greetings()), Route::Query(String::new()));
        assert_eq!(classify(&text("   "), &greetings()), Route::Query(String::new()));
        assert_eq!(
            classify(&text("hola, ¿tienen mouse?"), &greetings()),
            Route::Query("hola, ¿tienen mouse?".into())
        );
        assert!(matches!(
            classify(&with_media("", "image/jpeg"), &greetings()),
            Route::Media { kind: MediaKind::Image, .. }
        ));
        assert!(matches!(
            classify(&with_media("hola", "audio/ogg"), &greetings()),
            Route::Media { kind: MediaKind::Audio, .. }
        ));
        assert_eq!(
            classify(&with_media("", "video/mp4"), &greetings()),
            Route::Unsupported { content_type: "video/mp4".into() }
        );
    }

    #[tokio::test]
    async fn greeting_is_case_insensitive_and_bypasses_everything() {
        let f = fixture(MockModel::new(), StaticInventory::failing(), MockMedia::new());
        for greeting in ["Hola", "BUENOS DÍAS", " hi "] {
            let reply = f.dispatcher.dispatch(text(greeting)).await;
            assert_eq!(reply, f.messages.greeting);
        }
        assert_eq!(f.model.generate_calls(), 0);
        assert_eq!(f.model.probe_calls(), 0);
    }

    #[tokio::test]
    async fn empty_body_goes_to_the_model() {
        let f = with_model(MockModel::new());
        let reply = f.dispatcher.dispatch(text("")).await;
        assert_eq!(reply, "mock response");
        assert_eq!(f.model.generate_calls(), 1);
    }

    #[tokio::test]
    async fn deny_listed_query_is_redirected_without_model_call() {
        let f = with_model(MockModel::new());
        let reply = f.dispatcher.dispatch(text("Quiero COMPRAR una laptop")).await;
        assert_eq!(reply, f.messages.off_topic);
        assert_eq!(f.model.generate_calls(), 0);
        assert_eq!(f.model.probe_calls(), 0);
    }

    #[tokio::test]
    async fn query_reaches_model_and_records_session() {
        let f = with_model(MockModel::with_responses(vec![
            "Tenemos 5 Laptop Dell XPS 13.".into(),
        ]));

        let reply = f.dispatcher.dispatch(text("¿tienen laptops Dell?")).await;
        assert_eq!(reply, "Tenemos 5 Laptop Dell XPS 13.");

        let request = f.model.last_request().await.unwrap();
        assert!(request.prompt.contains("Laptop Dell XPS 13"));
        assert!(request.prompt.contains("CONSULTA DEL USUARIO: ¿tienen laptops Dell?"));
        assert!(request.history.is_empty());

        let session = f.sessions.load(SENDER).await;
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].content, "¿tienen laptops Dell?");
        assert_eq!(session.history[1].role, Role::Model);
    }

    #[tokio::test]
    async fn history_is_sent_on_the_next_turn() {
        let f = with_model(MockModel::with_responses(vec!["uno".into(), "dos".into()]));
        f.dispatcher.dispatch(text("¿precio del mouse?")).await;
        f.dispatcher.dispatch(text("¿y del teclado?")).await;

        let request = f.model.last_request().await.unwrap();
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[1].content, "uno");
        assert_eq!(f.model.probe_calls(), 1);
    }

    #[tokio::test]
    async fn empty_inventory_answers_no_information() {
        let f = fixture(MockModel::new(), StaticInventory::empty(), MockMedia::new());
        let reply = f.dispatcher.dispatch(text("¿tienen monitores?")).await;
        assert_eq!(reply, f.messages.no_information);
        assert_eq!(f.model.generate_calls(), 0);
    }

    #[tokio::test]
    async fn inventory_failure_degrades_to_no_information() {
        let f = fixture(MockModel::new(), StaticInventory::failing(), MockMedia::new());
        let reply = f.dispatcher.dispatch(text("¿tienen monitores?")).await;
        assert_eq!(reply, f.messages.no_information);
    }

    #[tokio::test]
    async fn unresolvable_endpoint_gives_general_error() {
        let f = with_model(MockModel::new().with_available_models(&[]));
        let reply = f.dispatcher.dispatch(text("¿tienen mouse?")).await;
        assert_eq!(reply, f.messages.general_error);
        assert_eq!(f.model.generate_calls(), 0);
    }

    #[tokio::test]
    async fn model_failure_gives_general_error_and_skips_session() {
        let f = with_model(MockModel::new().failing_generation());
        let reply = f.dispatcher.dispatch(text("¿tienen mouse?")).await;
        assert_eq!(reply, f.messages.general_error);
        assert!(f.sessions.load(SENDER).await.history.is_empty());
    }

    #[tokio::test]
    async fn unsupported_media_is_refused() {
        let f = with_model(MockModel::new());
        let reply = f.dispatcher.dispatch(with_media("", "video/mp4")).await;
        assert_eq!(reply, f.messages.unsupported_media);
        assert_eq!(f.media.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn image_is_uploaded_with_caption() {
        let f = with_model(MockModel::with_responses(vec!["Es un Mouse Logitech.".into()]));
        let reply = f
            .dispatcher
            .dispatch(with_media("¿lo tienen?", "image/jpeg"))
            .await;
        assert_eq!(reply, "Es un Mouse Logitech.");
        assert_eq!(f.media.fetch_calls(), 1);
        assert_eq!(f.model.upload_calls(), 1);

        let request = f.model.last_request().await.unwrap();
        assert!(request.prompt.contains("Analiza esta imagen"));
        assert!(request.prompt.contains("MENSAJE DEL USUARIO: ¿lo tienen?"));
        assert!(request.file.is_some());

        let session = f.sessions.load(SENDER).await;
        assert_eq!(session.history[0].content, "[image] ¿lo tienen?");
    }

    #[tokio::test]
    async fn media_caption_goes_through_deny_list() {
        let f = with_model(MockModel::new());
        let reply = f
            .dispatcher
            .dispatch(with_media("mi contraseña", "image/png"))
            .await;
        assert_eq!(reply, f.messages.off_topic);
        assert_eq!(f.media.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn media_download_failure() {
        let f = fixture(MockModel::new(), StaticInventory::sample(), MockMedia::failing());
        let reply = f.dispatcher.dispatch(with_media("", "audio/ogg")).await;
        assert_eq!(reply, f.messages.media_download_error);
        assert_eq!(f.model.upload_calls(), 0);
    }

    #[tokio::test]
    async fn media_model_failure() {
        let f = with_model(MockModel::new().failing_upload());
        let reply = f.dispatcher.dispatch(with_media("", "audio/ogg")).await;
        assert_eq!(reply, f.messages.media_error);
    }

    #[tokio::test]
    async fn panic_becomes_apology() {
        let f = with_model(MockModel::new().panicking_generation());
        let reply = f.dispatcher.dispatch(text("¿tienen mouse?")).await;
        assert_eq!(reply, f.messages.apology);
    }

    #[tokio::test]
    async fn long_reply_is_truncated() {
        let f = with_model(MockModel::with_responses(vec!["a".repeat(800)]));
        let reply = f.dispatcher.dispatch(text("¿lista completa?")).await;
        assert_eq!(reply.chars().count(), 503);
        assert!(reply.ends_with("..."));
    }
}
