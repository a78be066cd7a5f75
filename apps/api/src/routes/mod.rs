pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::documents::handlers as documents;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless action API
        .route("/api/v1/actions/validate", post(chat::handle_validate))
        .route("/api/v1/actions/execute", post(chat::handle_execute))
        .route("/api/v1/chat", post(chat::handle_chat))
        // Document sessions
        .route("/api/v1/documents", post(documents::handle_create_document))
        .route(
            "/api/v1/documents/:id",
            get(documents::handle_get_document).delete(documents::handle_close_document),
        )
        .route(
            "/api/v1/documents/:id/history",
            get(documents::handle_document_history),
        )
        .route(
            "/api/v1/documents/:id/version/:v",
            get(documents::handle_get_version),
        )
        .route(
            "/api/v1/documents/:id/chat",
            post(documents::handle_document_chat),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::actions::registry::SectionRegistry;
    use crate::chat::model::{ActionModel, ModelRequest};
    use crate::config::Config;
    use crate::documents::DocumentStore;
    use crate::llm_client::LlmError;

    /// Replies with the queued responses in order, then an empty action list.
    struct CannedModel {
        replies: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ActionModel for CannedModel {
        async fn propose(&self, _request: &ModelRequest<'_>) -> Result<String, LlmError> {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Ok(json!({"message": "Nothing to change.", "actions": []}).to_string());
            }
            Ok(replies.remove(0))
        }
    }

    fn app(replies: Vec<Value>) -> Router {
        let state = AppState {
            model: Arc::new(CannedModel {
                replies: Mutex::new(replies.iter().map(Value::to_string).collect()),
            }),
            registry: Arc::new(SectionRegistry::default()),
            documents: DocumentStore::default(),
            config: Config {
                anthropic_api_key: "test".to_string(),
                port: 0,
                rust_log: "info".to_string(),
                chat_max_retries: 1,
                chat_history_window: 6,
            },
        };
        build_router(state)
    }

    fn resume() -> Value {
        json!({
            "personalInfo": {"fullName": "Jane Doe"},
            "experience": [{"id": "exp-1", "company": "Acme", "bulletPoints": ["Shipped v1"]}],
            "skills": [{"id": "ski-1", "name": "Rust"}],
            "sectionConfig": {
                "experience": {"order": 1},
                "skills": {"order": 2}
            }
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(body) => Body::from(body.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(vec![]), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-chat-api");
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let body = json!([
            {"type": "toggleSection", "sectionId": "skills", "visible": false},
            {"type": "launchRocket"}
        ]);
        let (status, outcome) =
            send(&app(vec![]), "POST", "/api/v1/actions/validate", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["valid"].as_array().unwrap().len(), 1);
        assert_eq!(outcome["errors"][0]["kind"], "unknown_action_type");
        assert_eq!(outcome["errors"][0]["index"], 1);
    }

    #[tokio::test]
    async fn test_validate_rejects_scalar() {
        let (status, body) = send(
            &app(vec![]),
            "POST",
            "/api/v1/actions/validate",
            Some(json!(42)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_execute_endpoint() {
        let body = json!({
            "document": resume(),
            "actions": [
                {"type": "addBullet", "itemId": "exp-1", "text": "Cut costs 30%"},
                {"type": "removeItem", "section": "skills", "itemId": "ski-9"}
            ]
        });
        let (status, report) =
            send(&app(vec![]), "POST", "/api/v1/actions/execute", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            report["resultingDocument"]["experience"][0]["bulletPoints"],
            json!(["Shipped v1", "Cut costs 30%"])
        );
        assert_eq!(report["perActionResults"][0]["outcome"]["status"], "succeeded");
        assert_eq!(report["perActionResults"][0]["label"], "Add Bullet");
        assert_eq!(report["perActionResults"][1]["outcome"]["status"], "failed");
        assert_eq!(
            report["perActionResults"][1]["outcome"]["error"]["kind"],
            "unknown_target_id"
        );
        assert_eq!(report["modifiedSections"], json!(["experience"]));
        assert_eq!(report["validationErrors"], json!([]));
    }

    #[tokio::test]
    async fn test_stateless_chat() {
        let reply = json!({
            "message": "Skills are hidden.",
            "actions": [{"type": "toggleSection", "sectionId": "skills", "visible": false}]
        });
        let body = json!({"message": "hide skills", "document": resume()});
        let (status, turn) = send(&app(vec![reply]), "POST", "/api/v1/chat", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["status"], "applied");
        assert_eq!(turn["document"]["sectionConfig"]["skills"]["visible"], false);
        assert_eq!(turn["transcript"][0]["role"], "assistant");
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let body = json!({"message": "  ", "document": resume()});
        let (status, error) = send(&app(vec![]), "POST", "/api/v1/chat", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_document_session_flow() {
        let app = app(vec![
            json!({
                "message": "Renamed it.",
                "actions": [{"type": "renameSection", "sectionId": "experience", "title": "Work History"}]
            }),
            json!({"message": "Looks good to me.", "actions": []}),
        ]);

        let (status, created) = send(
            &app,
            "POST",
            "/api/v1/documents",
            Some(json!({"document": resume()})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["version"], 1);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, turn) = send(
            &app,
            "POST",
            &format!("/api/v1/documents/{id}/chat"),
            Some(json!({"message": "call it work history"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["committed"], true);
        assert_eq!(turn["version"], 2);

        // A purely conversational turn does not create a version.
        let (_, turn) = send(
            &app,
            "POST",
            &format!("/api/v1/documents/{id}/chat"),
            Some(json!({"message": "is it good now?"})),
        )
        .await;
        assert_eq!(turn["committed"], false);
        assert_eq!(turn["version"], 2);

        let (_, latest) = send(&app, "GET", &format!("/api/v1/documents/{id}"), None).await;
        assert_eq!(latest["version"], 2);
        assert_eq!(
            latest["document"]["sectionConfig"]["experience"]["title"],
            "Work History"
        );

        let (_, history) = send(&app, "GET", &format!("/api/v1/documents/{id}/history"), None).await;
        assert_eq!(history.as_array().unwrap().len(), 2);
        assert_eq!(history[1]["summary"], "call it work history");

        let (_, original) =
            send(&app, "GET", &format!("/api/v1/documents/{id}/version/1"), None).await;
        assert!(original["document"]["sectionConfig"]["experience"]
            .get("title")
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_document_and_version() {
        let app = app(vec![]);
        let (status, body) = send(
            &app,
            "GET",
            "/api/v1/documents/6f1c2d3e-0000-4000-8000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (_, created) = send(
            &app,
            "POST",
            "/api/v1/documents",
            Some(json!({"document": resume()})),
        )
        .await;
        let id = created["id"].as_str().unwrap();
        let (status, _) = send(&app, "GET", &format!("/api/v1/documents/{id}/version/7"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_close_document() {
        let app = app(vec![]);
        let (_, created) = send(
            &app,
            "POST",
            "/api/v1/documents",
            Some(json!({"document": resume()})),
        )
        .await;
        let uri = format!("/api/v1/documents/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
