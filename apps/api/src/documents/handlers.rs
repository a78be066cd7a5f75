use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::handlers::require_message;
use crate::chat::orchestrator::{run_turn, TurnOutcome, TurnRequest};
use crate::chat::ChatMessage;
use crate::documents::store::{DocumentVersion, VersionSummary};
use crate::errors::AppError;
use crate::llm_client::Role;
use crate::models::ResumeDocument;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateDocumentRequest {
    pub document: ResumeDocument,
}

#[derive(Serialize)]
pub struct CreateDocumentResponse {
    pub id: Uuid,
    pub version: u32,
}

#[derive(Deserialize)]
pub struct SessionChatRequest {
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionChatResponse {
    /// Latest committed version after this turn.
    pub version: u32,
    pub committed: bool,
    #[serde(flatten)]
    pub turn: TurnOutcome,
}

/// POST /api/v1/documents
pub async fn handle_create_document(
    State(state): State<AppState>,
    Json(req): Json<CreateDocumentRequest>,
) -> (StatusCode, Json<CreateDocumentResponse>) {
    let id = state.documents.create(req.document).await;
    (
        StatusCode::CREATED,
        Json(CreateDocumentResponse { id, version: 1 }),
    )
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentVersion>, AppError> {
    let session = state.documents.session(id).await?;
    let session = session.lock().await;
    Ok(Json(session.latest().clone()))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_close_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.documents.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/documents/:id/history
pub async fn handle_document_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<VersionSummary>>, AppError> {
    let session = state.documents.session(id).await?;
    let history = session.lock().await.history();
    Ok(Json(history))
}

/// GET /api/v1/documents/:id/version/:v
pub async fn handle_get_version(
    State(state): State<AppState>,
    Path((id, v)): Path<(Uuid, u32)>,
) -> Result<Json<DocumentVersion>, AppError> {
    let session = state.documents.session(id).await?;
    let session = session.lock().await;
    session
        .version(v)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Document {id} has no version {v}")))
}

/// POST /api/v1/documents/:id/chat
///
/// The session lock is held for the whole turn, so turns against one
/// document run one at a time and each starts from the previous commit.
pub async fn handle_document_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SessionChatRequest>,
) -> Result<Json<SessionChatResponse>, AppError> {
    let message = require_message(&req.message)?;
    let session = state.documents.session(id).await?;
    let mut session = session.lock().await;

    let turn = run_turn(
        state.model.as_ref(),
        &state.registry,
        TurnRequest {
            message,
            history: session.transcript(),
            document: &session.latest().document,
        },
        state.turn_options(),
    )
    .await?;

    let committed = turn.changed_document();
    let version = if committed {
        session.commit(
            turn.document.clone(),
            message,
            turn.modified_sections.clone(),
        )
    } else {
        info!("Document {id}: turn made no changes, nothing committed");
        session.latest().version
    };

    session.record_messages(
        std::iter::once(ChatMessage::new(Role::User, message)).chain(turn.transcript.iter().cloned()),
        state.config.chat_history_window,
    );

    Ok(Json(SessionChatResponse {
        version,
        committed,
        turn,
    }))
}
