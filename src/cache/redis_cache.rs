use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use super::store::{CacheError, CacheOp, CacheResult, KvCache};

/// Redis 实现
#[derive(Clone)]
pub struct RedisCache {
    redis: Arc<RedisClient>,
    timeout: Duration,
}

impl RedisCache {
    pub fn new(redis: Arc<RedisClient>, timeout: Duration) -> Self {
        Self { redis, timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> CacheResult<T>
    where
        F: Future<Output = Result<T, redis::RedisError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout),
        }
    }
}

#[async_trait]
impl KvCache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.bounded(async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;
            conn.get(key).await
        })
        .await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()> {
        self.bounded(async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;
            conn.set_ex(key, value, ttl_secs).await
        })
        .await
    }

    async fn del(&self, keys: &[String]) -> CacheResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        self.bounded(async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;
            conn.del(keys).await
        })
        .await
    }

    async fn swap_ex(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<Option<String>> {
        self.bounded(async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(ttl_secs)
                .arg("GET")
                .query_async(&mut conn)
                .await
        })
        .await
    }

    async fn any_member(&self, set_key: &str, members: &[String]) -> CacheResult<bool> {
        if members.is_empty() {
            return Ok(false);
        }
        let flags: Vec<bool> = self
            .bounded(async {
                let mut conn = self.redis.get_multiplexed_async_connection().await?;
                redis::cmd("SMISMEMBER")
                    .arg(set_key)
                    .arg(members)
                    .query_async(&mut conn)
                    .await
            })
            .await?;

        Ok(flags.into_iter().any(|hit| hit))
    }

    async fn execute(&self, ops: Vec<CacheOp>) -> CacheResult<()> {
        if ops.is_empty() {
            return Ok(());
        }

        // MULTI/EXEC 包裹，读者只会看到执行前或执行后的状态
        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in ops {
            match op {
                CacheOp::SetEx {
                    key,
                    value,
                    ttl_secs,
                } => {
                    pipe.set_ex(key, value, ttl_secs).ignore();
                }
                CacheOp::Del { key } => {
                    pipe.del(key).ignore();
                }
                CacheOp::SAdd { key, members } => {
                    if !members.is_empty() {
                        pipe.sadd(key, members).ignore();
                    }
                }
            }
        }

        self.bounded(async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;
            let _: () = pipe.query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(())
        })
        .await
    }

    async fn incr_window(&self, key: &str, window_secs: u64) -> CacheResult<i64> {
        self.bounded(async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;

            // 使用 Redis 的 INCR 和 EXPIRE 命令实现计数器
            let count: i64 = conn.incr(key, 1).await?;
            if count == 1 {
                let _: () = conn.expire(key, window_secs as i64).await?;
            }
            Ok::<_, redis::RedisError>(count)
        })
        .await
    }
}
