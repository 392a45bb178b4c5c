// 缓存模块
// 包含缓存键、缓存抽象及其实现、缓存操作

pub mod keys;
pub mod local;
pub mod memory;
pub mod operations;
pub mod redis_cache;
pub mod store;

// 重新导出常用类型，方便其他模块使用
pub use local::AccountLocalCache;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
pub use store::{CacheError, CacheOp, CacheResult, KvCache};
