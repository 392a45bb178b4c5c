use std::sync::Arc;

use tracing::{error, info, warn};

use super::error::{AuthError, RebuildError};
use super::identity::{Identity, RouteSignature};
use crate::cache::KvCache;
use crate::cache::operations::PermissionCacheOperations;
use crate::database::CredentialStore;
use crate::database::models::Account;

/// 超级管理员的权限集合
pub const ALLOW_ALL: &str = "*";

/// 接口级权限校验与权限集合维护
pub struct PermissionChecker {
    cache: Arc<dyn KvCache>,
    store: Arc<dyn CredentialStore>,
    service_code: String,
}

impl PermissionChecker {
    pub fn new(
        cache: Arc<dyn KvCache>,
        store: Arc<dyn CredentialStore>,
        service_code: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            store,
            service_code: service_code.into(),
        }
    }

    /// 候选权限码：`*`、`{svc}:*`、`{svc}:{METHOD}:{path}`，任意命中即放行
    pub fn candidates(&self, route: &RouteSignature) -> Vec<String> {
        vec![
            ALLOW_ALL.to_string(),
            format!("{}:*", self.service_code),
            route.permission_code(&self.service_code),
        ]
    }

    pub async fn check(&self, identity: &Identity, route: &RouteSignature) -> Result<(), AuthError> {
        if identity.is_super_admin {
            return Ok(());
        }

        let candidates = self.candidates(route);
        let allowed = PermissionCacheOperations::account_has_any(
            self.cache.as_ref(),
            identity.account_id(),
            &candidates,
        )
        .await
        .map_err(|e| {
            error!("Permission lookup failed for {}: {}", identity.account_id(), e);
            AuthError::Forbidden
        })?;

        if allowed {
            Ok(())
        } else {
            warn!(
                "无权访问接口: account={} {} {}",
                identity.account_id(),
                route.method,
                route.path
            );
            Err(AuthError::Forbidden)
        }
    }

    /// 从角色 -> 资源 -> 权限推导账户的权限码
    pub async fn permission_codes(&self, account: &Account) -> Result<Vec<String>, RebuildError> {
        if account.is_super_admin {
            return Ok(vec![ALLOW_ALL.to_string()]);
        }

        // 员工可使用不可分配的资源
        let resource_ids = self
            .store
            .resource_ids_for_role(account.role_id, account.is_staff)
            .await?;
        if resource_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut codes = self.store.permission_codes_for_resources(&resource_ids).await?;
        codes.sort_unstable();
        codes.dedup();
        Ok(codes)
    }

    /// 重新计算并整体替换账户的权限集合
    ///
    /// 失败时缓存保持原状或为空，不会出现新旧混合。
    pub async fn rebuild(&self, account: &Account) -> Result<Vec<String>, RebuildError> {
        let codes = self.permission_codes(account).await.inspect_err(|e| {
            error!("Failed to derive permissions for {}: {}", account.id, e);
        })?;

        PermissionCacheOperations::replace_account_set(self.cache.as_ref(), account.id, &codes)
            .await
            .inspect_err(|e| {
                error!("Failed to write permissions for {}: {}", account.id, e);
            })?;

        info!("Rebuilt {} permission(s) for account {}", codes.len(), account.id);
        Ok(codes)
    }
}

pub fn require_super_admin(identity: &Identity) -> Result<(), AuthError> {
    if identity.is_super_admin {
        Ok(())
    } else {
        warn!("非超级管理员: {}", identity.account_id());
        Err(AuthError::Forbidden)
    }
}

pub fn require_staff(identity: &Identity) -> Result<(), AuthError> {
    if identity.is_staff {
        Ok(())
    } else {
        warn!("非员工账户: {}", identity.account_id());
        Err(AuthError::Forbidden)
    }
}
