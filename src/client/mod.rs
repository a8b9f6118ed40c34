pub mod relay;
pub mod session;
pub mod terminal;

use crate::history::StoreError;
use crate::models::chat::Sender;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid relay URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Relay(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Where a session draws its transcript.
#[async_trait]
pub trait ChatView: Send {
    fn append_message(&mut self, sender: Sender, text: &str);

    fn show_typing_indicator(&mut self);

    fn hide_typing_indicator(&mut self);

    fn clear_transcript(&mut self);

    async fn confirm(&mut self, prompt: &str) -> bool;
}
