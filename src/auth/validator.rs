use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::{error, warn};

use super::bearer::extract_bearer;
use super::error::AuthError;
use super::identity::Identity;
use crate::cache::operations::SessionCacheOperations;
use crate::cache::{AccountLocalCache, KvCache};
use crate::database::CredentialStore;

/// 请求声明的使用场景
pub const FRONT_SCENE_HEADER: &str = "x-front-scene";

/// Bearer token 校验
pub struct TokenValidator {
    cache: Arc<dyn KvCache>,
    store: Arc<dyn CredentialStore>,
    accounts: AccountLocalCache,
}

impl TokenValidator {
    pub fn new(
        cache: Arc<dyn KvCache>,
        store: Arc<dyn CredentialStore>,
        accounts: AccountLocalCache,
    ) -> Self {
        Self {
            cache,
            store,
            accounts,
        }
    }

    pub async fn validate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = extract_bearer(headers)?;
        let declared_scene = headers
            .get(FRONT_SCENE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        self.validate_token(token, declared_scene).await
    }

    /// token -> 会话 -> 场景校验 -> 账户
    pub async fn validate_token(
        &self,
        token: &str,
        declared_scene: Option<&str>,
    ) -> Result<Identity, AuthError> {
        let session = match SessionCacheOperations::resolve(self.cache.as_ref(), token).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                warn!("token缓存失效");
                return Err(AuthError::SessionExpiredOrInvalid);
            }
            Err(e) => {
                error!("Session lookup failed: {}", e);
                return Err(AuthError::SessionExpiredOrInvalid);
            }
        };

        if let Some(declared) = declared_scene {
            if declared != session.scene.as_str() {
                warn!(
                    "token场景不匹配: account={} stored={} declared={}",
                    session.account_id, session.scene, declared
                );
                return Err(AuthError::SceneMismatch);
            }
        }

        let account_id = session.account_id;
        let account = self
            .accounts
            .get_or_fetch(account_id, || self.store.account_by_id(account_id))
            .await
            .map_err(|e| {
                error!("Account lookup failed for {}: {}", account_id, e);
                AuthError::AccountNotFound
            })?;

        match account {
            Some(account) if account.is_active() => Ok(Identity::new(account, session.scene, token)),
            Some(_) => {
                warn!("token账户已禁用: {}", account_id);
                Err(AuthError::AccountNotFound)
            }
            None => {
                warn!("token账户不存在: {}", account_id);
                Err(AuthError::AccountNotFound)
            }
        }
    }
}
