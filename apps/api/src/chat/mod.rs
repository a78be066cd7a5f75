pub mod handlers;
pub mod model;
pub mod orchestrator;
pub mod prompts;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm_client::Role;

/// One entry of the visible chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
