mod file;
mod memory;
mod redis;

pub use file::FileHistoryStore;
pub use memory::MemoryHistoryStore;
pub use self::redis::RedisHistoryStore;

use crate::cli::ChatArgs;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("Unsupported history store type: {0}")]
    Unsupported(String),
}

/// String key-value storage in the spirit of browser local storage.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub fn create_history_store(args: &ChatArgs) -> Result<Arc<dyn HistoryStore>, StoreError> {
    match args.history_type.to_lowercase().as_str() {
        "file" => Ok(Arc::new(FileHistoryStore::new(&args.history_path))),
        "memory" => Ok(Arc::new(MemoryHistoryStore::new())),
        "redis" => Ok(Arc::new(RedisHistoryStore::new(&args.history_host)?)),
        _ => Err(StoreError::Unsupported(args.history_type.clone())),
    }
}

pub fn initialize_history_store(args: &ChatArgs) -> Result<Arc<dyn HistoryStore>, StoreError> {
    let location = match args.history_type.to_lowercase().as_str() {
        "file" => args.history_path.as_str(),
        "redis" => args.history_host.as_str(),
        _ => "process memory",
    };
    info!("Chat history will be stored in: {} at {} (key '{}')", args.history_type, location, args.history_key);
    create_history_store(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ Cli, Command };
    use clap::Parser;

    fn chat_args(history_type: &str) -> ChatArgs {
        let cli = Cli::try_parse_from(["gemini-relay", "chat", "--history-type", history_type]).unwrap();
        match cli.command {
            Command::Chat(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_store_type() {
        let err = create_history_store(&chat_args("sqlite")).err().unwrap();
        assert!(matches!(err, StoreError::Unsupported(t) if t == "sqlite"));
    }

    #[tokio::test]
    async fn memory_store_is_selectable() {
        let store = create_history_store(&chat_args("MEMORY")).unwrap();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
