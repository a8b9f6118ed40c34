use async_trait::async_trait;
use redis::{ AsyncCommands, Client };

use super::{ HistoryStore, StoreError };

pub struct RedisHistoryStore {
    client: Client,
}

impl RedisHistoryStore {
    pub fn new(host: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::open(host)?,
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }
}

#[async_trait]
impl HistoryStore for RedisHistoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.get_connection().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.get_connection().await?;
        let _: i64 = conn.del(key).await?;
        Ok(())
    }
}
