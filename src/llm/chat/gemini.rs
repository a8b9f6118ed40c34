use async_trait::async_trait;
use log::{ debug, info };
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::ChatClient;
use crate::llm::{ Content, LlmConfig, LlmError };

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
}

pub struct GeminiChatClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        let chat_model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            http: Client::new(),
            api_key,
            model: chat_model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| LlmError::Config("Gemini API key is required for GeminiChatClient".to_string()))?;

        Ok(Self::new(api_key, config.model.clone(), config.base_url.clone()))
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn generate_content(&self, contents: Vec<Content>) -> Result<Value, LlmError> {
        let url = self.endpoint();
        info!(
            "GeminiChatClient::generate_content() → model={} contents={}",
            self.model,
            contents.len()
        );

        let response = self.http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&(GenerateContentRequest { contents: &contents }))
            .send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status { status, body });
        }

        debug!("Gemini response from {}: {} bytes", url, body.len());
        Ok(serde_json::from_str(&body)?)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
