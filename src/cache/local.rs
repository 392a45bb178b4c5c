use std::future::Future;
use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::database::models::Account;
use crate::database::repositories::StoreResult;

/// 进程内账户缓存，容量有限、按时间过期
///
/// 不做主动失效：账户被禁用或删除后，最多在 TTL 内仍会命中旧快照。
pub struct AccountLocalCache {
    entries: Mutex<LruCache<i64, (Instant, Account)>>,
    ttl: Duration,
}

impl AccountLocalCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// 命中未过期的快照直接返回，否则调用 `fetch` 回源并写入。
    ///
    /// 读取与回填在同一把锁内完成，同一时刻只有一个回源请求。
    pub async fn get_or_fetch<F, Fut>(&self, account_id: i64, fetch: F) -> StoreResult<Option<Account>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<Option<Account>>>,
    {
        let mut entries = self.entries.lock().await;

        if let Some((cached_at, account)) = entries.get(&account_id) {
            if cached_at.elapsed() < self.ttl {
                return Ok(Some(account.clone()));
            }
        }
        entries.pop(&account_id);

        let fetched = fetch().await?;
        if let Some(account) = &fetched {
            entries.put(account_id, (Instant::now(), account.clone()));
        }
        Ok(fetched)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
