use log::debug;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use super::ClientError;
use crate::models::chat::{
    ChatMessage,
    ErrorResponse,
    MultiTurnRequest,
    ReplyResponse,
    SingleTurnRequest,
};

const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Clone)]
pub struct RelayClient {
    http: Client,
    base: Url,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            http: Client::new(),
            base: Url::parse(&base)?,
        })
    }

    /// Sends the full conversation to `/api/chat`.
    pub async fn chat(&self, history: &[ChatMessage]) -> Result<String, ClientError> {
        self.post("api/chat", &(MultiTurnRequest { messages: history })).await
    }

    /// One-shot `/chat` call with no prior context.
    pub async fn chat_single(&self, text: &str) -> Result<String, ClientError> {
        self.post("chat", &(SingleTurnRequest { message: Some(text.to_string()) })).await
    }

    async fn post<T: Serialize + ?Sized>(&self, route: &str, body: &T) -> Result<String, ClientError> {
        let url = self.base.join(route)?;
        debug!("POST {}", url);

        let response = self.http.post(url).json(body).send().await?;
        if !response.status().is_success() {
            let message = response
                .json::<ErrorResponse>().await
                .ok()
                .map(|e| e.error)
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            return Err(ClientError::Relay(message));
        }

        let reply: ReplyResponse = response.json().await?;
        Ok(reply.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{ Mock, MockServer, ResponseTemplate, matchers::{ body_json, method, path } };

    #[tokio::test]
    async fn posts_history_to_api_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "messages": [
                    { "role": "user", "content": "hi" },
                    { "role": "model", "content": "hello" },
                    { "role": "user", "content": "again" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "sure" })))
            .expect(1)
            .mount(&server).await;

        let relay = RelayClient::new(&server.uri()).unwrap();
        let history = vec![ChatMessage::user("hi"), ChatMessage::model("hello"), ChatMessage::user("again")];
        assert_eq!(relay.chat(&history).await.unwrap(), "sure");
    }

    #[tokio::test]
    async fn single_turn_goes_to_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({ "message": "ping" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "pong" })))
            .mount(&server).await;

        let relay = RelayClient::new(&format!("{}/", server.uri())).unwrap();
        assert_eq!(relay.chat_single("ping").await.unwrap(), "pong");
    }

    #[tokio::test]
    async fn error_field_becomes_the_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "Messages must be an array" }))
            )
            .mount(&server).await;

        let relay = RelayClient::new(&server.uri()).unwrap();
        let err = relay.chat(&[]).await.unwrap_err();
        assert_eq!(err.to_string(), "Messages must be an array");
    }

    #[tokio::test]
    async fn error_without_body_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server).await;

        let relay = RelayClient::new(&server.uri()).unwrap();
        let err = relay.chat_single("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Something went wrong");
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(RelayClient::new("not a url"), Err(ClientError::Url(_))));
    }
}
