use crate::cache::keys::code_key;
use crate::cache::store::{CacheResult, KvCache};
use crate::database::models::SendCodeScene;

/// 验证码缓存操作
///
/// 验证码由短信/邮件发送方写入，这里只负责校验和消费。
pub struct CodeCacheOperations;

impl CodeCacheOperations {
    pub async fn store(
        cache: &dyn KvCache,
        scene: SendCodeScene,
        identifier: &str,
        code: &str,
        ttl_secs: u64,
    ) -> CacheResult<()> {
        cache
            .set_ex(&code_key(scene, identifier), code, ttl_secs)
            .await
    }

    /// 校验成功后立即删除，验证码只能使用一次
    pub async fn verify_and_consume(
        cache: &dyn KvCache,
        scene: SendCodeScene,
        identifier: &str,
        code: &str,
    ) -> CacheResult<bool> {
        let key = code_key(scene, identifier);
        match cache.get(&key).await? {
            Some(expected) if !code.is_empty() && expected == code => {
                cache.del(&[key]).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
