//! Chat orchestrator: one user message in, a new document snapshot and a
//! transcript out.
//!
//! Flow per turn:
//! 1. Ask the model for a response (prompt built from the trailing history)
//! 2. Parse + validate it; a whole-response rejection is re-issued with the
//!    errors as feedback, at most `max_retries` times
//! 3. Execute the surviving actions against a copy of the snapshot
//! 4. Render the transcript: the model's reply plus a note for every action
//!    that was dropped or could not be applied
//!
//! Per-action failures never trigger a retry. The caller's snapshot is never
//! mutated; committing `TurnOutcome::document` is the caller's decision.

use serde::Serialize;
use tracing::{info, warn};

use crate::actions::describe::format_section_name;
use crate::actions::executor::{execute, ActionOutcome, ActionResult};
use crate::actions::registry::SectionRegistry;
use crate::actions::validator::{
    parse_and_validate, retry_prompt, ResponseRejection, ValidatedResponse, ValidationError,
};
use crate::actions::ChatAction;
use crate::chat::model::{ActionModel, ModelRequest};
use crate::chat::ChatMessage;
use crate::errors::AppError;
use crate::llm_client::Role;
use crate::models::ResumeDocument;

pub const REJECTION_MESSAGE: &str =
    "I had trouble processing your request. Could you try rephrasing it?";

#[derive(Debug, Clone, Copy)]
pub struct TurnOptions {
    pub max_retries: u32,
    pub history_window: usize,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            max_retries: 1,
            history_window: 6,
        }
    }
}

pub struct TurnRequest<'a> {
    pub message: &'a str,
    pub history: &'a [ChatMessage],
    pub document: &'a ResumeDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// At least one action changed the document.
    Applied,
    /// Conversational reply, or every proposed action failed.
    NoChanges,
    /// The model never produced a usable response.
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub status: TurnStatus,
    pub message: String,
    pub document: ResumeDocument,
    pub actions: Vec<ChatAction>,
    pub results: Vec<ActionResult>,
    pub validation_errors: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<ResponseRejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
    pub suggested_questions: Vec<String>,
    pub modified_sections: Vec<String>,
    /// Assistant messages to append to the visible chat.
    pub transcript: Vec<ChatMessage>,
    /// Model calls made, including retries.
    pub attempts: u32,
}

impl TurnOutcome {
    pub fn changed_document(&self) -> bool {
        self.status == TurnStatus::Applied
    }
}

/// Runs one chat turn.
///
/// Only a transport failure of the model call is an `Err`; a model that keeps
/// producing unusable output ends in `TurnStatus::Rejected`.
pub async fn run_turn(
    model: &dyn ActionModel,
    registry: &SectionRegistry,
    request: TurnRequest<'_>,
    options: TurnOptions,
) -> Result<TurnOutcome, AppError> {
    let history = trailing(request.history, options.history_window);
    let mut feedback: Option<String> = None;
    let mut attempts = 0u32;

    let response = loop {
        attempts += 1;
        let raw = model
            .propose(&ModelRequest {
                message: request.message,
                history,
                document: request.document,
                registry,
                retry_feedback: feedback.as_deref(),
            })
            .await?;

        match parse_and_validate(&raw, registry) {
            Ok(response) => break Ok(response),
            Err(rejection) if attempts <= options.max_retries => {
                warn!("Attempt {attempts} rejected ({rejection}), re-issuing with feedback");
                feedback = Some(retry_prompt(&rejection));
            }
            Err(rejection) => break Err(rejection),
        }
    };

    let outcome = match response {
        Ok(response) => apply_response(response, request.document, registry, attempts),
        Err(rejection) => {
            warn!("Giving up after {attempts} attempts: {rejection}");
            rejected(rejection, request.document, attempts)
        }
    };

    info!(
        "Chat turn finished: status={:?}, attempts={}, modified={:?}",
        outcome.status, outcome.attempts, outcome.modified_sections
    );
    Ok(outcome)
}

fn trailing(history: &[ChatMessage], window: usize) -> &[ChatMessage] {
    &history[history.len().saturating_sub(window)..]
}

fn apply_response(
    response: ValidatedResponse,
    document: &ResumeDocument,
    registry: &SectionRegistry,
    attempts: u32,
) -> TurnOutcome {
    let report = execute(document, &response.actions, registry);

    let status = if report.applied_count() > 0 {
        TurnStatus::Applied
    } else {
        TurnStatus::NoChanges
    };

    let mut transcript = vec![ChatMessage::new(Role::Assistant, response.message.as_str())];
    if let Some(note) = problem_note(&report.failures(), &response.errors) {
        transcript.push(ChatMessage::new(Role::Assistant, note));
    }
    if status == TurnStatus::Applied && !report.modified_sections.is_empty() {
        let areas: Vec<String> = report
            .modified_sections
            .iter()
            .map(|s| format_section_name(s))
            .collect();
        transcript.push(ChatMessage::new(
            Role::Assistant,
            format!("Updated: {}", areas.join(", ")),
        ));
    }

    TurnOutcome {
        status,
        message: response.message,
        document: report.resulting_document,
        actions: response.actions,
        results: report.per_action_results,
        validation_errors: response.errors,
        rejection: None,
        follow_up_question: response.follow_up_question,
        suggested_questions: response.suggested_questions,
        modified_sections: report.modified_sections,
        transcript,
        attempts,
    }
}

fn rejected(
    rejection: ResponseRejection,
    document: &ResumeDocument,
    attempts: u32,
) -> TurnOutcome {
    TurnOutcome {
        status: TurnStatus::Rejected,
        message: REJECTION_MESSAGE.to_string(),
        document: document.clone(),
        actions: Vec::new(),
        results: Vec::new(),
        validation_errors: match &rejection {
            ResponseRejection::NoValidActions { errors } => errors.clone(),
            _ => Vec::new(),
        },
        rejection: Some(rejection),
        follow_up_question: None,
        suggested_questions: Vec::new(),
        modified_sections: Vec::new(),
        transcript: vec![ChatMessage::new(Role::Assistant, REJECTION_MESSAGE)],
        attempts,
    }
}

/// One line per skipped action. `None` when everything went through.
fn problem_note(failures: &[&ActionResult], errors: &[ValidationError]) -> Option<String> {
    let mut lines: Vec<String> = failures
        .iter()
        .map(|result| match &result.outcome {
            ActionOutcome::Failed { reason, .. } => {
                format!("Couldn't apply: {} ({reason})", result.description)
            }
            _ => format!("Couldn't apply: {}", result.description),
        })
        .collect();
    lines.extend(
        errors
            .iter()
            .map(|e| format!("Skipped an invalid change: {e}")),
    );

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
