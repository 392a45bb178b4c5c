use crate::cache::keys::{account_apis_key, api_key_apis_key};
use crate::cache::store::{CacheOp, CacheResult, KvCache};

/// 权限集合缓存操作
pub struct PermissionCacheOperations;

impl PermissionCacheOperations {
    /// 整体替换账户权限集合：同一 pipeline 内先删除再写入
    ///
    /// 删除与写入之间的读者只会看到空集合（拒绝），不会看到旧权限与新权限混合。
    pub async fn replace_account_set(
        cache: &dyn KvCache,
        account_id: i64,
        codes: &[String],
    ) -> CacheResult<()> {
        let key = account_apis_key(account_id);
        let mut ops = vec![CacheOp::Del { key: key.clone() }];
        if !codes.is_empty() {
            ops.push(CacheOp::SAdd {
                key,
                members: codes.to_vec(),
            });
        }
        cache.execute(ops).await
    }

    /// 账户权限集合中是否包含任意一个候选权限码
    pub async fn account_has_any(
        cache: &dyn KvCache,
        account_id: i64,
        candidates: &[String],
    ) -> CacheResult<bool> {
        cache
            .any_member(&account_apis_key(account_id), candidates)
            .await
    }

    /// ApiKey 权限集合中是否包含任意一个候选权限码
    pub async fn api_key_has_any(
        cache: &dyn KvCache,
        api_key: &str,
        candidates: &[String],
    ) -> CacheResult<bool> {
        cache.any_member(&api_key_apis_key(api_key), candidates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryCache;

    #[tokio::test]
    async fn replace_drops_old_members() {
        let cache = MemoryCache::new();
        PermissionCacheOperations::replace_account_set(&cache, 5, &["a".into(), "b".into()])
            .await
            .unwrap();
        PermissionCacheOperations::replace_account_set(&cache, 5, &["b".into()])
            .await
            .unwrap();

        let members = cache.members("UC:Account:Apis:5").await;
        assert_eq!(members.into_iter().collect::<Vec<_>>(), vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn replace_with_empty_set_removes_key() {
        let cache = MemoryCache::new();
        PermissionCacheOperations::replace_account_set(&cache, 5, &["a".into()])
            .await
            .unwrap();
        PermissionCacheOperations::replace_account_set(&cache, 5, &[])
            .await
            .unwrap();

        assert!(!cache.contains_key("UC:Account:Apis:5").await);
        assert!(
            !PermissionCacheOperations::account_has_any(&cache, 5, &["a".into()])
                .await
                .unwrap()
        );
    }
}
