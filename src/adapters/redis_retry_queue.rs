use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::Value;

use crate::ports::{QueueError, RetryQueue};

/// Retry queue backed by Redis lists. Workers pop from the other end.
#[derive(Clone)]
pub struct RedisRetryQueue {
    redis_client: redis::Client,
}

impl RedisRetryQueue {
    pub fn new(redis_url: &str) -> Result<Self, QueueError> {
        let redis_client = redis::Client::open(redis_url)?;
        Ok(Self { redis_client })
    }

    pub async fn ping(&self) -> Result<(), QueueError> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl RetryQueue for RedisRetryQueue {
    async fn enqueue(&self, queue: &str, payload: &Value) -> Result<(), QueueError> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let message = serde_json::to_string(payload)?;
        let _: () = conn.lpush(queue, message).await?;
        Ok(())
    }
}
