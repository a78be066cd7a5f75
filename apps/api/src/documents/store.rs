//! In-memory, append-only document sessions.
//!
//! Every commit pushes a new version; earlier versions are never rewritten.
//! Each session sits behind its own async mutex, and a chat turn holds that
//! lock from snapshot read to commit, so two turns against one document can
//! never both commit from the same snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::chat::ChatMessage;
use crate::errors::AppError;
use crate::models::ResumeDocument;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub version: u32,
    pub document: ResumeDocument,
    pub created_at: DateTime<Utc>,
    /// What produced this version, e.g. the chat request that led to it.
    pub summary: String,
    pub modified_sections: Vec<String>,
}

/// A `DocumentVersion` without the document body, for history listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub summary: String,
    pub modified_sections: Vec<String>,
}

#[derive(Debug)]
pub struct DocumentSession {
    pub id: Uuid,
    versions: Vec<DocumentVersion>,
    transcript: Vec<ChatMessage>,
}

impl DocumentSession {
    fn new(id: Uuid, document: ResumeDocument) -> Self {
        let initial = DocumentVersion {
            version: 1,
            document,
            created_at: Utc::now(),
            summary: "Initial version".to_string(),
            modified_sections: Vec::new(),
        };
        Self {
            id,
            versions: vec![initial],
            transcript: Vec::new(),
        }
    }

    pub fn latest(&self) -> &DocumentVersion {
        // A session is created with its first version and versions are never removed.
        &self.versions[self.versions.len() - 1]
    }

    pub fn version(&self, version: u32) -> Option<&DocumentVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    pub fn history(&self) -> Vec<VersionSummary> {
        self.versions
            .iter()
            .map(|v| VersionSummary {
                version: v.version,
                created_at: v.created_at,
                summary: v.summary.clone(),
                modified_sections: v.modified_sections.clone(),
            })
            .collect()
    }

    /// Appends a new version and returns its number.
    pub fn commit(
        &mut self,
        document: ResumeDocument,
        summary: impl Into<String>,
        modified_sections: Vec<String>,
    ) -> u32 {
        let version = self.latest().version + 1;
        self.versions.push(DocumentVersion {
            version,
            document,
            created_at: Utc::now(),
            summary: summary.into(),
            modified_sections,
        });
        info!("Committed document {} version {version}", self.id);
        version
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Appends to the transcript, keeping only the trailing `keep` messages.
    pub fn record_messages(
        &mut self,
        messages: impl IntoIterator<Item = ChatMessage>,
        keep: usize,
    ) {
        self.transcript.extend(messages);
        let excess = self.transcript.len().saturating_sub(keep);
        self.transcript.drain(..excess);
    }
}

#[derive(Clone, Default)]
pub struct DocumentStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<DocumentSession>>>>>,
}

impl DocumentStore {
    /// Opens a session whose version 1 is `document`.
    pub async fn create(&self, document: ResumeDocument) -> Uuid {
        let id = Uuid::new_v4();
        let session = DocumentSession::new(id, document);
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        info!("Opened document session {id}");
        id
    }

    pub async fn session(&self, id: Uuid) -> Result<Arc<Mutex<DocumentSession>>, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
    }

    /// Drops a session and all of its versions. A turn already holding the
    /// session finishes against its own handle.
    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Closed document session {id}"))
            .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::Role;
    use serde_json::json;

    fn doc(name: &str) -> ResumeDocument {
        serde_json::from_value(json!({"personalInfo": {"fullName": name}})).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let store = DocumentStore::default();
        let id = store.create(doc("Jane")).await;

        let session = store.session(id).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.latest().version, 1);
        assert_eq!(session.latest().document, doc("Jane"));
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = DocumentStore::default();
        let result = store.session(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_commits_are_append_only() {
        let store = DocumentStore::default();
        let id = store.create(doc("Jane")).await;
        let session = store.session(id).await.unwrap();
        let mut session = session.lock().await;

        assert_eq!(session.commit(doc("Jane Doe"), "use full name", vec!["personalInfo".into()]), 2);
        assert_eq!(session.commit(doc("J. Doe"), "abbreviate", vec!["personalInfo".into()]), 3);

        assert_eq!(session.version(1).unwrap().document, doc("Jane"));
        assert_eq!(session.version(2).unwrap().document, doc("Jane Doe"));
        assert_eq!(session.latest().document, doc("J. Doe"));
        assert!(session.version(4).is_none());

        let history = session.history();
        let versions: Vec<u32> = history.iter().map(|h| h.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(history[0].summary, "Initial version");
        assert_eq!(history[2].modified_sections, vec!["personalInfo"]);
    }

    #[tokio::test]
    async fn test_transcript_accumulates() {
        let store = DocumentStore::default();
        let id = store.create(doc("Jane")).await;
        let session = store.session(id).await.unwrap();
        let mut session = session.lock().await;

        session.record_messages(
            [
                ChatMessage::new(Role::User, "hide skills"),
                ChatMessage::new(Role::Assistant, "Done."),
            ],
            6,
        );
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_transcript_keeps_trailing_messages() {
        let store = DocumentStore::default();
        let id = store.create(doc("Jane")).await;
        let session = store.session(id).await.unwrap();
        let mut session = session.lock().await;

        for turn in 0..5 {
            session.record_messages(
                [
                    ChatMessage::new(Role::User, format!("request {turn}")),
                    ChatMessage::new(Role::Assistant, format!("reply {turn}")),
                ],
                4,
            );
        }
        let contents: Vec<&str> = session
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["request 3", "reply 3", "request 4", "reply 4"]);
    }

    #[tokio::test]
    async fn test_close_removes_session() {
        let store = DocumentStore::default();
        let id = store.create(doc("Jane")).await;

        store.close(id).await.unwrap();
        assert!(matches!(store.session(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.close(id).await, Err(AppError::NotFound(_))));
    }
}
