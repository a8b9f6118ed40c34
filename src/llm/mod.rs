pub mod chat;
pub mod extract;

use reqwest::StatusCode;
use serde::{ Deserialize, Serialize };
use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{0}")]
    Config(String),
    #[error("Error fetching from upstream: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Upstream request failed with status {status}: {body}")]
    Status {
        status: StatusCode,
        body: String,
    },
    #[error("Failed to parse upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One element of the `contents` array sent to `generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl Content {
    pub fn text(role: Option<String>, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::text(Some("user".to_string()), text)
    }
}
