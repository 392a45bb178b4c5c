use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use super::error::RebuildError;
use super::identity::Identity;
use super::permission::PermissionChecker;
use crate::cache::operations::{CodeCacheOperations, SessionCacheOperations};
use crate::cache::{CacheError, KvCache};
use crate::database::models::{Account, SendCodeScene, TokenScene};
use crate::database::{CredentialStore, Identifier, StoreError};
use crate::utils::{generate_token, hash_password, is_strong_password, verify_password};

/// 登录与账户自助操作的失败原因
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("账号或密码错误")]
    InvalidCredentials,
    #[error("验证码错误")]
    InvalidCode,
    #[error("账号已被禁用")]
    Disabled,
    #[error("账号未注册")]
    AccountNotRegistered,
    #[error("旧密码错误")]
    WrongOldPassword,
    #[error("密码需为8-20位，且至少包含大写字母、小写字母、数字、符号中的三种")]
    WeakPassword,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Rebuild(#[from] RebuildError),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl LoginError {
    /// 内部故障，不向调用方暴露细节
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            LoginError::Store(_) | LoginError::Cache(_) | LoginError::Rebuild(_) | LoginError::Hash(_)
        )
    }
}

/// 登录成功后返回给客户端的会话
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub account: Account,
    pub token: String,
    pub expired_at: DateTime<Utc>,
}

pub struct SessionService {
    cache: Arc<dyn KvCache>,
    store: Arc<dyn CredentialStore>,
    permissions: Arc<PermissionChecker>,
    token_ttl_secs: u64,
}

impl SessionService {
    pub fn new(
        cache: Arc<dyn KvCache>,
        store: Arc<dyn CredentialStore>,
        permissions: Arc<PermissionChecker>,
        token_ttl_secs: u64,
    ) -> Self {
        Self {
            cache,
            store,
            permissions,
            token_ttl_secs,
        }
    }

    pub async fn login_with_password(
        &self,
        identifier: &str,
        password: &str,
        scene: TokenScene,
    ) -> Result<IssuedSession, LoginError> {
        let account = self
            .find_account(identifier)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        if !check_password(password, &account.password).await? {
            warn!("密码错误: account={}", account.id);
            return Err(LoginError::InvalidCredentials);
        }
        ensure_active(&account)?;

        self.open_session(account, scene).await
    }

    /// 验证码存放在 `UC:Code:login:{account_id}`，校验通过即作废
    pub async fn login_with_code(
        &self,
        identifier: &str,
        code: &str,
        scene: TokenScene,
    ) -> Result<IssuedSession, LoginError> {
        let account = self
            .find_account(identifier)
            .await?
            .ok_or(LoginError::AccountNotRegistered)?;

        let valid = CodeCacheOperations::verify_and_consume(
            self.cache.as_ref(),
            SendCodeScene::Login,
            &account.id.to_string(),
            code,
        )
        .await?;
        if !valid {
            warn!("验证码错误: account={}", account.id);
            return Err(LoginError::InvalidCode);
        }
        ensure_active(&account)?;

        self.open_session(account, scene).await
    }

    /// 重建权限集合 -> 写入会话 -> 记录登录时间
    async fn open_session(&self, mut account: Account, scene: TokenScene) -> Result<IssuedSession, LoginError> {
        self.permissions.rebuild(&account).await?;

        let token = generate_token();
        SessionCacheOperations::issue(
            self.cache.as_ref(),
            account.id,
            scene,
            &token,
            self.token_ttl_secs,
        )
        .await?;

        let now = Utc::now();
        match self.store.touch_last_login(account.id, now).await {
            Ok(()) => account.last_login_at = Some(now),
            Err(e) => error!("Failed to record last login for {}: {}", account.id, e),
        }

        info!("Account {} logged in on {}", account.id, scene);
        Ok(IssuedSession {
            account,
            token,
            expired_at: now + Duration::seconds(self.token_ttl_secs as i64),
        })
    }

    pub async fn logout(&self, identity: &Identity) -> Result<(), LoginError> {
        SessionCacheOperations::revoke(
            self.cache.as_ref(),
            &identity.token,
            identity.account_id(),
            identity.scene,
        )
        .await?;
        info!("Account {} logged out of {}", identity.account_id(), identity.scene);
        Ok(())
    }

    pub async fn change_password(
        &self,
        identity: &Identity,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), LoginError> {
        if !is_strong_password(new_password) {
            return Err(LoginError::WeakPassword);
        }

        // 本地缓存中的快照可能过期，密码以存储为准
        let account = self
            .store
            .account_by_id(identity.account_id())
            .await?
            .ok_or(LoginError::AccountNotRegistered)?;
        if !check_password(old_password, &account.password).await? {
            return Err(LoginError::WrongOldPassword);
        }

        self.save_password(account.id, new_password).await
    }

    /// 验证码存放在 `UC:Code:reset_password:{account_id}`
    pub async fn reset_password(&self, identifier: &str, code: &str, password: &str) -> Result<(), LoginError> {
        if !is_strong_password(password) {
            return Err(LoginError::WeakPassword);
        }

        let account = self
            .find_account(identifier)
            .await?
            .ok_or(LoginError::AccountNotRegistered)?;

        let valid = CodeCacheOperations::verify_and_consume(
            self.cache.as_ref(),
            SendCodeScene::ResetPassword,
            &account.id.to_string(),
            code,
        )
        .await?;
        if !valid {
            return Err(LoginError::InvalidCode);
        }

        self.save_password(account.id, password).await
    }

    async fn find_account(&self, identifier: &str) -> Result<Option<Account>, LoginError> {
        match Identifier::parse(identifier) {
            Some(identifier) => Ok(self.store.account_by_identifier(&identifier).await?),
            None => Ok(None),
        }
    }

    async fn save_password(&self, account_id: i64, password: &str) -> Result<(), LoginError> {
        let password = password.to_string();
        let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| LoginError::Hash(e.to_string()))?
            .map_err(|e| LoginError::Hash(e.to_string()))?;

        self.store.update_password(account_id, &hashed).await?;
        info!("Password updated for account {}", account_id);
        Ok(())
    }
}

fn ensure_active(account: &Account) -> Result<(), LoginError> {
    if account.is_active() {
        Ok(())
    } else {
        warn!("禁用账户尝试登录: {}", account.id);
        Err(LoginError::Disabled)
    }
}

/// bcrypt 校验放到阻塞线程池
async fn check_password(password: &str, hash: &str) -> Result<bool, LoginError> {
    let (password, hash) = (password.to_string(), hash.to_string());
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| LoginError::Hash(e.to_string()))?
        .map_err(|e| LoginError::Hash(e.to_string()))
}
