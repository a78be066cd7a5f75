//! The model seam of a chat turn.
//!
//! The orchestrator only needs "given this request, give me raw response
//! text". `AppState` carries an `Arc<dyn ActionModel>`; production uses the
//! Anthropic client, tests use a scripted model.

use async_trait::async_trait;

use crate::actions::registry::SectionRegistry;
use crate::chat::prompts::{build_conversation, build_system_prompt};
use crate::chat::ChatMessage;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::ResumeDocument;

/// Everything a backend needs to propose actions for one attempt.
pub struct ModelRequest<'a> {
    pub message: &'a str,
    pub history: &'a [ChatMessage],
    pub document: &'a ResumeDocument,
    pub registry: &'a SectionRegistry,
    /// Rendered `retry_prompt` when re-issuing after a rejected response.
    pub retry_feedback: Option<&'a str>,
}

#[async_trait]
pub trait ActionModel: Send + Sync {
    /// Returns the raw response text. Parsing and validation happen upstream.
    async fn propose(&self, request: &ModelRequest<'_>) -> Result<String, LlmError>;
}

#[async_trait]
impl ActionModel for LlmClient {
    async fn propose(&self, request: &ModelRequest<'_>) -> Result<String, LlmError> {
        let system = build_system_prompt(request.registry);
        let messages = build_conversation(
            request.history,
            request.message,
            request.document,
            request.retry_feedback,
        )?;
        self.converse_text(&system, &messages).await
    }
}
