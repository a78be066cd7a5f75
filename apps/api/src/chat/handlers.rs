use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::actions::executor::{execute, ExecutionReport};
use crate::actions::validator::{
    validate_actions, ResponseRejection, ValidationError, ValidationOutcome,
};
use crate::chat::orchestrator::{run_turn, TurnOutcome, TurnRequest};
use crate::chat::ChatMessage;
use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExecuteRequest {
    pub document: ResumeDocument,
    pub actions: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    #[serde(flatten)]
    pub report: ExecutionReport,
    pub validation_errors: Vec<ValidationError>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub document: ResumeDocument,
}

/// POST /api/v1/actions/validate
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Result<Json<ValidationOutcome>, AppError> {
    let candidates = candidate_list(&raw)?;
    Ok(Json(validate_actions(candidates, &state.registry)))
}

/// POST /api/v1/actions/execute
pub async fn handle_execute(
    State(state): State<AppState>,
    Json(req): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, AppError> {
    let outcome = validate_actions(candidate_list(&req.actions)?, &state.registry);
    if !outcome.is_clean() {
        warn!(
            "Executing {} actions, dropped {} invalid",
            outcome.valid.len(),
            outcome.errors.len()
        );
    }
    let report = execute(&req.document, &outcome.valid, &state.registry);
    Ok(Json(ExecuteResponse {
        report,
        validation_errors: outcome.errors,
    }))
}

/// POST /api/v1/chat
/// Stateless turn: the caller owns the document and the transcript.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<TurnOutcome>, AppError> {
    let message = require_message(&req.message)?;
    let outcome = run_turn(
        state.model.as_ref(),
        &state.registry,
        TurnRequest {
            message,
            history: &req.history,
            document: &req.document,
        },
        state.turn_options(),
    )
    .await?;
    Ok(Json(outcome))
}

pub(crate) fn require_message(message: &str) -> Result<&str, AppError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }
    Ok(trimmed)
}

/// Accepts a bare action array, an envelope with an `actions` array, or a
/// single action object.
fn candidate_list(raw: &Value) -> Result<&[Value], AppError> {
    match raw {
        Value::Array(actions) => Ok(actions),
        Value::Object(map) => match map.get("actions") {
            Some(Value::Array(actions)) => Ok(actions),
            Some(_) => Err(rejection(ResponseRejection::ActionsNotArray)),
            None => Ok(std::slice::from_ref(raw)),
        },
        _ => Err(rejection(ResponseRejection::NotAnObject)),
    }
}

fn rejection(rejection: ResponseRejection) -> AppError {
    AppError::UnprocessableEntity(rejection.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_list_shapes() {
        let bare = json!([{"type": "toggleSection"}]);
        assert_eq!(candidate_list(&bare).unwrap().len(), 1);

        let envelope = json!({"message": "hi", "actions": [{}, {}]});
        assert_eq!(candidate_list(&envelope).unwrap().len(), 2);

        let single = json!({"type": "removeCustomSection", "sectionId": "custom-1"});
        assert_eq!(candidate_list(&single).unwrap(), &[single.clone()]);

        assert!(matches!(
            candidate_list(&json!({"actions": "all of them"})),
            Err(AppError::UnprocessableEntity(_))
        ));
        assert!(candidate_list(&json!("toggle")).is_err());
    }

    #[test]
    fn test_require_message() {
        assert_eq!(require_message("  hide skills \n").unwrap(), "hide skills");
        assert!(matches!(require_message("   "), Err(AppError::Validation(_))));
    }
}
