use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("cache call timed out")]
    Timeout,
    #[error("cache unavailable")]
    Unavailable,
}

pub type CacheResult<T> = Result<T, CacheError>;

/// pipeline 中的单条写操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp {
    SetEx {
        key: String,
        value: String,
        ttl_secs: u64,
    },
    Del {
        key: String,
    },
    SAdd {
        key: String,
        members: Vec<String>,
    },
}

/// 键值缓存抽象，每次调用都有超时限制
#[async_trait]
pub trait KvCache: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()>;

    async fn del(&self, keys: &[String]) -> CacheResult<()>;

    /// 写入新值并返回旧值（SET .. EX .. GET），读写一步完成
    async fn swap_ex(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<Option<String>>;

    /// members 中任意一个属于集合即返回 true，一次往返完成
    async fn any_member(&self, set_key: &str, members: &[String]) -> CacheResult<bool>;

    /// 按顺序原子执行一组写操作
    async fn execute(&self, ops: Vec<CacheOp>) -> CacheResult<()>;

    /// 计数器自增，首次创建时设置窗口过期时间
    async fn incr_window(&self, key: &str, window_secs: u64) -> CacheResult<i64>;
}
