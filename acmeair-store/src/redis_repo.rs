use acmeair_core::{ControlSink, CoreError, CoreResult, LoadSnapshot};
use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult};
use tracing::debug;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    pub async fn publish_load(&self, name: &str, users: i64, hw: f32) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = redis::pipe()
            .atomic()
            .set(format!("{}:users", name), users)
            .ignore()
            .set(format!("{}:hw", name), hw)
            .ignore()
            .query_async(&mut conn)
            .await?;
        debug!("Published load for {}: users={} hw={}", name, users, hw);
        Ok(())
    }

    pub async fn get_hw_target(&self, name: &str) -> RedisResult<Option<f32>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("{}:hw_target", name);
        conn.get(key).await
    }
}

/// A target the controller wrote is only passed on when it differs from the
/// weight the service already runs with.
pub fn hw_update(current: f32, target: Option<f32>) -> Option<f32> {
    target.filter(|hw| *hw != current)
}

/// Publishes load snapshots to Redis and picks up load-weight targets
/// written there by an external controller.
pub struct RedisControlSink {
    redis: RedisClient,
}

impl RedisControlSink {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl ControlSink for RedisControlSink {
    async fn report(&self, snapshot: &LoadSnapshot) -> CoreResult<Option<f32>> {
        self.redis
            .publish_load(&snapshot.name, snapshot.users, snapshot.hw)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))?;

        let target = self
            .redis
            .get_hw_target(&snapshot.name)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))?;

        Ok(hw_update(snapshot.hw, target))
    }
}
