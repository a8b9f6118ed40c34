pub mod gemini;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use self::gemini::GeminiChatClient;
use super::{ Content, LlmConfig, LlmError };

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends the whole `contents` sequence in one request and hands back the
    /// raw response body. Shape checks are left to the caller.
    async fn generate_content(&self, contents: Vec<Content>) -> Result<Value, LlmError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client = GeminiChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
