use crate::error::{ RelayError, EMPTY_MESSAGE, MESSAGES_NOT_ARRAY };
use crate::llm::chat::ChatClient;
use crate::llm::extract::extract_text;
use crate::llm::Content;
use crate::models::chat::{ ReplyResponse, SingleTurnRequest };
use axum::{
    extract::{ rejection::JsonRejection, State },
    routing::post,
    Json,
    Router,
};
use log::{ debug, error, info };
use serde_json::Value;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{ Any, CorsLayer };

#[derive(Clone)]
struct AppState {
    client: Arc<dyn ChatClient>,
}

pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

pub fn router(client: Arc<dyn ChatClient>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(single_turn_handler))
        .route("/api/chat", post(multi_turn_handler))
        .layer(cors)
        .with_state(AppState { client })
}

pub async fn start_http_server(
    addr: SocketAddr,
    client: Arc<dyn ChatClient>,
    tls: Option<TlsPaths>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = router(client);

    if let Some(tls) = tls {
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            &tls.cert_path,
            &tls.key_path
        ).await?;

        info!("Relay listening on https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            e
        })?;

        info!("Relay listening on http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

/// Maps `/api/chat` entries onto upstream contents. `message` wins over
/// `content` when both are present and non-empty.
pub fn normalize_messages(messages: Option<&Value>) -> Result<Vec<Content>, RelayError> {
    let entries = messages
        .and_then(Value::as_array)
        .ok_or_else(|| RelayError::BadRequest(MESSAGES_NOT_ARRAY.to_string()))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let text = non_empty_str(entry, "message")
                .or_else(|| non_empty_str(entry, "content"))
                .ok_or_else(|| {
                    RelayError::BadRequest(format!("{} Invalid entry at index {}.", EMPTY_MESSAGE, index))
                })?;
            let role = entry.get("role").and_then(Value::as_str).map(str::to_string);
            Ok(Content::text(role, text))
        })
        .collect()
}

fn non_empty_str<'a>(entry: &'a Value, field: &str) -> Option<&'a str> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

async fn generate(state: &AppState, contents: Vec<Content>) -> Result<String, RelayError> {
    match state.client.generate_content(contents).await {
        Ok(response) => Ok(extract_text(&response)),
        Err(e) => {
            error!("Upstream call to {} failed: {}", state.client.get_model(), e);
            Err(e.into())
        }
    }
}

async fn single_turn_handler(
    State(state): State<AppState>,
    payload: Result<Json<SingleTurnRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, RelayError> {
    let Json(req) = payload.map_err(|e| RelayError::BadRequest(e.body_text()))?;
    let message = req.message.ok_or_else(|| {
        RelayError::BadRequest("Request body must include a message string".to_string())
    })?;
    debug!("POST /chat ({} chars)", message.len());

    let text = generate(&state, vec![Content::user(message)]).await?;
    Ok(Json(ReplyResponse { message: text }))
}

async fn multi_turn_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ReplyResponse>, RelayError> {
    let Json(body) = payload.map_err(|e| RelayError::BadRequest(e.body_text()))?;
    let contents = normalize_messages(body.get("messages"))?;
    debug!("POST /api/chat ({} messages)", contents.len());

    let text = generate(&state, contents).await?;
    Ok(Json(ReplyResponse { message: text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{ Request, StatusCode };
    use serde_json::json;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct StubClient {
        reply: Option<Value>,
        seen: Mutex<Vec<Vec<Content>>>,
    }

    impl StubClient {
        fn replying(reply: Value) -> Arc<Self> {
            Arc::new(Self { reply: Some(reply), seen: Mutex::new(Vec::new()) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { reply: None, seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl ChatClient for StubClient {
        async fn generate_content(&self, contents: Vec<Content>) -> Result<Value, LlmError> {
            self.seen.lock().unwrap().push(contents);
            self.reply.clone().ok_or_else(|| LlmError::Config("quota exceeded".to_string()))
        }

        fn get_model(&self) -> String {
            "stub".to_string()
        }
    }

    fn gemini_reply(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
    }

    async fn post(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap()
            ).await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn single_turn_returns_reply() {
        let stub = StubClient::replying(gemini_reply("Hi there"));
        let app = router(stub.clone());

        let (status, body) = post(app, "/chat", json!({ "message": "Hello" }).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Hi there" }));

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[vec![Content::user("Hello")]]);
    }

    #[tokio::test]
    async fn single_turn_upstream_failure_is_500() {
        let app = router(StubClient::failing());
        let (status, body) = post(app, "/chat", json!({ "message": "Hello" }).to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "quota exceeded" }));
    }

    #[tokio::test]
    async fn single_turn_without_message_is_400() {
        let app = router(StubClient::replying(gemini_reply("unused")));
        let (status, body) = post(app, "/chat", "{}".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("message"));
    }

    #[tokio::test]
    async fn multi_turn_forwards_full_history() {
        let stub = StubClient::replying(gemini_reply("Third answer"));
        let app = router(stub.clone());
        let request =
            json!({
            "messages": [
                { "role": "user", "content": "first" },
                { "role": "model", "message": "second" },
                { "role": "user", "message": "", "content": "third" }
            ]
        });

        let (status, body) = post(app, "/api/chat", request.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Third answer" }));

        let seen = stub.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            vec![
                Content::user("first"),
                Content::text(Some("model".to_string()), "second"),
                Content::user("third")
            ]
        );
    }

    #[tokio::test]
    async fn multi_turn_rejects_non_array() {
        for request in [json!({ "messages": "hello" }), json!({ "messages": { "role": "user" } }), json!({})] {
            let stub = StubClient::replying(gemini_reply("unused"));
            let app = router(stub.clone());
            let (status, body) = post(app, "/api/chat", request.to_string()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Messages must be an array" }));
            assert!(stub.seen.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn multi_turn_rejects_empty_entry() {
        let stub = StubClient::replying(gemini_reply("unused"));
        let app = router(stub.clone());
        let request =
            json!({
            "messages": [
                { "role": "user", "content": "fine" },
                { "role": "model", "content": "" }
            ]
        });

        let (status, body) = post(app, "/api/chat", request.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with(EMPTY_MESSAGE));
        assert!(error.contains("index 1"));
        assert!(stub.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn multi_turn_upstream_failure_is_500() {
        let app = router(StubClient::failing());
        let request = json!({ "messages": [{ "role": "user", "content": "hi" }] });
        let (status, body) = post(app, "/api/chat", request.to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "quota exceeded" }));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let app = router(StubClient::replying(gemini_reply("unused")));
        let (status, body) = post(app, "/api/chat", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn reply_without_text_is_serialized_response() {
        let upstream = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let app = router(StubClient::replying(upstream.clone()));
        let (status, body) = post(app, "/chat", json!({ "message": "x" }).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], serde_json::to_string_pretty(&upstream).unwrap());
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = router(StubClient::replying(gemini_reply("ok")));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("origin", "http://example.test")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "message": "hi" }).to_string()))
                    .unwrap()
            ).await
            .unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[test]
    fn role_is_forwarded_verbatim_or_omitted() {
        let messages = json!([{ "content": "no role" }, { "role": "model", "content": "x" }]);
        let contents = normalize_messages(Some(&messages)).unwrap();
        assert_eq!(contents[0].role, None);
        assert_eq!(contents[1].role.as_deref(), Some("model"));
    }
}
