use std::sync::Arc;

use crate::actions::registry::SectionRegistry;
use crate::chat::model::ActionModel;
use crate::chat::orchestrator::TurnOptions;
use crate::config::Config;
use crate::documents::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Backend that proposes actions. Default: the Anthropic client.
    pub model: Arc<dyn ActionModel>,
    pub registry: Arc<SectionRegistry>,
    pub documents: DocumentStore,
    pub config: Config,
}

impl AppState {
    pub fn turn_options(&self) -> TurnOptions {
        TurnOptions {
            max_retries: self.config.chat_max_retries,
            history_window: self.config.chat_history_window,
        }
    }
}
