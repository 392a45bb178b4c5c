use crate::cache::keys::{account_token_key, session_value, token_key};
use crate::cache::store::{CacheResult, KvCache};
use crate::database::models::TokenScene;

/// 会话缓存中解析出的 token 归属
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEntry {
    pub account_id: i64,
    pub scene: TokenScene,
}

impl SessionEntry {
    /// 解析 "{account_id}:{scene}"
    pub fn parse(raw: &str) -> Option<Self> {
        let (account_id, scene) = raw.split_once(':')?;
        Some(SessionEntry {
            account_id: account_id.parse().ok()?,
            scene: scene.parse().ok()?,
        })
    }
}

/// 会话缓存操作
pub struct SessionCacheOperations;

impl SessionCacheOperations {
    /// 写入新会话，同一账户同一场景下旧 token 一并失效
    ///
    /// 先写 token 键，再原子地交换反向键并删除换出的旧 token。
    /// 并发登录时只有最后完成交换的 token 保持有效。
    pub async fn issue(
        cache: &dyn KvCache,
        account_id: i64,
        scene: TokenScene,
        token: &str,
        ttl_secs: u64,
    ) -> CacheResult<()> {
        cache
            .set_ex(&token_key(token), &session_value(account_id, scene), ttl_secs)
            .await?;

        let reverse_key = account_token_key(account_id, scene);
        let previous = cache.swap_ex(&reverse_key, token, ttl_secs).await?;
        if let Some(old_token) = previous.filter(|t| t != token) {
            cache.del(&[token_key(&old_token)]).await?;
        }
        Ok(())
    }

    /// 查询 token 对应的会话；值格式异常视为不存在
    pub async fn resolve(cache: &dyn KvCache, token: &str) -> CacheResult<Option<SessionEntry>> {
        let raw = cache.get(&token_key(token)).await?;
        Ok(raw.and_then(|value| {
            let entry = SessionEntry::parse(&value);
            if entry.is_none() {
                tracing::warn!("Malformed session value: {}", value);
            }
            entry
        }))
    }

    /// 删除会话；反向键仍指向该 token 时一并删除
    pub async fn revoke(
        cache: &dyn KvCache,
        token: &str,
        account_id: i64,
        scene: TokenScene,
    ) -> CacheResult<()> {
        let reverse_key = account_token_key(account_id, scene);
        let current = cache.get(&reverse_key).await?;

        let mut keys = vec![token_key(token)];
        if current.as_deref() == Some(token) {
            keys.push(reverse_key);
        }
        cache.del(&keys).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryCache;

    #[test]
    fn parse_session_value() {
        assert_eq!(
            SessionEntry::parse("42:Web"),
            Some(SessionEntry {
                account_id: 42,
                scene: TokenScene::Web
            })
        );
        assert_eq!(SessionEntry::parse("42"), None);
        assert_eq!(SessionEntry::parse("abc:Web"), None);
        assert_eq!(SessionEntry::parse("42:Desktop"), None);
    }

    #[tokio::test]
    async fn second_login_on_same_scene_replaces_first() {
        let cache = MemoryCache::new();
        SessionCacheOperations::issue(&cache, 1, TokenScene::Web, "t1", 60)
            .await
            .unwrap();
        SessionCacheOperations::issue(&cache, 1, TokenScene::Mobile, "m1", 60)
            .await
            .unwrap();
        SessionCacheOperations::issue(&cache, 1, TokenScene::Web, "t2", 60)
            .await
            .unwrap();

        assert!(SessionCacheOperations::resolve(&cache, "t1").await.unwrap().is_none());
        assert!(SessionCacheOperations::resolve(&cache, "t2").await.unwrap().is_some());
        // 其他场景不受影响
        assert!(SessionCacheOperations::resolve(&cache, "m1").await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_logins_leave_one_live_token() {
        let cache = std::sync::Arc::new(MemoryCache::new());
        let tokens: Vec<String> = (0..16).map(|i| format!("c{}", i)).collect();

        let mut tasks = Vec::new();
        for token in tokens.clone() {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                SessionCacheOperations::issue(cache.as_ref(), 7, TokenScene::Web, &token, 60)
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let mut live = Vec::new();
        for token in &tokens {
            if SessionCacheOperations::resolve(cache.as_ref(), token).await.unwrap().is_some() {
                live.push(token.clone());
            }
        }
        assert_eq!(live.len(), 1);
        assert_eq!(cache.get("UC:Account:7:Web").await.unwrap(), live.pop());
    }

    #[tokio::test]
    async fn revoke_keeps_newer_reverse_entry() {
        let cache = MemoryCache::new();
        SessionCacheOperations::issue(&cache, 1, TokenScene::Web, "t1", 60)
            .await
            .unwrap();
        SessionCacheOperations::revoke(&cache, "t1", 1, TokenScene::Web)
            .await
            .unwrap();

        assert!(!cache.contains_key("UC:Token:t1").await);
        assert!(!cache.contains_key("UC:Account:1:Web").await);
    }
}
