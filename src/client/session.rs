use log::{ error, info, warn };
use std::sync::Arc;

use super::relay::RelayClient;
use super::{ ChatView, ClientError };
use crate::history::HistoryStore;
use crate::models::chat::{ ChatMessage, Sender };

pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the chat history?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Replied(String),
    Failed(String),
}

/// Client-side conversation: the ordered history, where it is persisted, and
/// the relay it talks to. `submit` takes `&mut self`, so only one request can
/// be in flight per session.
pub struct ChatSession {
    store: Arc<dyn HistoryStore>,
    relay: RelayClient,
    key: String,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Loads the persisted history under `key` and renders it.
    pub async fn open(
        store: Arc<dyn HistoryStore>,
        relay: RelayClient,
        key: &str,
        view: &mut dyn ChatView
    ) -> Result<Self, ClientError> {
        let messages = load_history(store.as_ref(), key).await?;
        info!("Loaded {} message(s) from history key '{}'", messages.len(), key);

        for msg in &messages {
            view.append_message(Sender::from(msg.role), &msg.content);
        }

        Ok(Self {
            store,
            relay,
            key: key.to_string(),
            messages,
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Sends `input` with the whole conversation. Blank input is ignored and
    /// yields `None`. Any failure, relay or storage, is drawn inline and the
    /// failed user turn is dropped from the history again.
    pub async fn submit(&mut self, input: &str, view: &mut dyn ChatView) -> Option<SubmitOutcome> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        view.append_message(Sender::User, text);
        self.messages.push(ChatMessage::user(text));
        if let Err(e) = self.persist().await {
            error!("Failed to save history before sending: {}", e);
            self.messages.pop();
            view.append_message(Sender::Bot, &failure_bubble(&e));
            return Some(SubmitOutcome::Failed(e.to_string()));
        }

        view.show_typing_indicator();
        let result = self.relay.chat(&self.messages).await;
        view.hide_typing_indicator();

        match result {
            Ok(reply) => {
                view.append_message(Sender::Bot, &reply);
                self.messages.push(ChatMessage::model(reply.clone()));
                if let Err(e) = self.persist().await {
                    error!("Failed to save reply to history: {}", e);
                }
                Some(SubmitOutcome::Replied(reply))
            }
            Err(e) => {
                error!("Chat request failed: {}", e);
                self.messages.pop();
                view.append_message(Sender::Bot, &failure_bubble(&e));
                if let Err(store_err) = self.persist().await {
                    error!("Failed to roll back history after a failed request: {}", store_err);
                }
                Some(SubmitOutcome::Failed(e.to_string()))
            }
        }
    }

    /// One-shot exchange through `/chat`; history is left untouched.
    pub async fn send_single(&self, input: &str, view: &mut dyn ChatView) -> Option<SubmitOutcome> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        view.append_message(Sender::User, text);
        view.show_typing_indicator();
        let result = self.relay.chat_single(text).await;
        view.hide_typing_indicator();

        Some(match result {
            Ok(reply) => {
                view.append_message(Sender::Bot, &reply);
                SubmitOutcome::Replied(reply)
            }
            Err(e) => {
                error!("Single-turn request failed: {}", e);
                view.append_message(Sender::Bot, &failure_bubble(&e));
                SubmitOutcome::Failed(e.to_string())
            }
        })
    }

    /// Wipes the transcript, the in-memory history and the stored key once
    /// the user confirms. Returns whether anything was cleared.
    pub async fn clear(&mut self, view: &mut dyn ChatView) -> Result<bool, ClientError> {
        if !view.confirm(CLEAR_PROMPT).await {
            return Ok(false);
        }

        view.clear_transcript();
        self.messages.clear();
        self.store.remove(&self.key).await?;
        info!("Cleared history key '{}'", self.key);
        Ok(true)
    }

    async fn persist(&self) -> Result<(), ClientError> {
        let json = serde_json::to_string(&self.messages).map_err(crate::history::StoreError::from)?;
        self.store.set(&self.key, &json).await?;
        Ok(())
    }
}

fn failure_bubble(err: &ClientError) -> String {
    format!("Sorry, something went wrong: {}", err)
}

async fn load_history(store: &dyn HistoryStore, key: &str) -> Result<Vec<ChatMessage>, ClientError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
        Ok(messages) => Ok(messages),
        Err(e) => {
            warn!("Ignoring unreadable history under '{}': {}", key, e);
            Ok(Vec::new())
        }
    }
}
