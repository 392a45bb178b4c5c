//! 进程内凭据存储，用于测试和本地开发，不持久化。

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::database::models::{Account, Permission, PermissionType, Resource, Role, Status};
use crate::database::repositories::{CredentialStore, Identifier, StoreResult};

#[derive(Default)]
struct Tables {
    accounts: HashMap<i64, Account>,
    roles: HashMap<i64, Role>,
    resources: HashMap<i64, Resource>,
    // resource_id -> role ids
    resource_roles: HashMap<i64, BTreeSet<i64>>,
    permissions: HashMap<String, Permission>,
    // resource_id -> permission codes
    resource_permissions: HashMap<i64, BTreeSet<String>>,
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    tables: RwLock<Tables>,
    account_reads: AtomicUsize,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// account_by_id 被调用的次数
    pub fn account_reads(&self) -> usize {
        self.account_reads.load(Ordering::SeqCst)
    }

    pub async fn insert_account(&self, account: Account) {
        self.tables.write().await.accounts.insert(account.id, account);
    }

    pub async fn insert_role(&self, role: Role) {
        self.tables.write().await.roles.insert(role.id, role);
    }

    /// 写入资源及其与角色、权限的关联
    pub async fn insert_resource(&self, resource: Resource, role_ids: &[i64], permission_codes: &[&str]) {
        let mut tables = self.tables.write().await;
        let id = resource.id;
        tables.resources.insert(id, resource);
        tables
            .resource_roles
            .entry(id)
            .or_default()
            .extend(role_ids.iter().copied());
        for code in permission_codes {
            tables
                .permissions
                .entry(code.to_string())
                .or_insert_with(|| Permission {
                    code: code.to_string(),
                    label: code.to_string(),
                    permission_type: PermissionType::Api,
                    is_deprecated: false,
                });
        }
        tables
            .resource_permissions
            .entry(id)
            .or_default()
            .extend(permission_codes.iter().map(|c| c.to_string()));
    }

    /// 标记权限为废弃，已关联的资源不受影响
    pub async fn deprecate_permission(&self, code: &str) {
        if let Some(permission) = self.tables.write().await.permissions.get_mut(code) {
            permission.is_deprecated = true;
        }
    }

    pub async fn permission(&self, code: &str) -> Option<Permission> {
        self.tables.read().await.permissions.get(code).cloned()
    }

    pub async fn set_status(&self, account_id: i64, status: Status) {
        if let Some(account) = self.tables.write().await.accounts.get_mut(&account_id) {
            account.status = status;
        }
    }

    pub async fn soft_delete_account(&self, account_id: i64) {
        if let Some(account) = self.tables.write().await.accounts.get_mut(&account_id) {
            account.deleted_at = Some(Utc::now());
        }
    }

    pub async fn set_resource_enabled(&self, resource_id: i64, enabled: bool) {
        if let Some(resource) = self.tables.write().await.resources.get_mut(&resource_id) {
            resource.enabled = enabled;
        }
    }

    pub async fn revoke_permission(&self, resource_id: i64, code: &str) {
        if let Some(codes) = self
            .tables
            .write()
            .await
            .resource_permissions
            .get_mut(&resource_id)
        {
            codes.remove(code);
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn account_by_id(&self, id: i64) -> StoreResult<Option<Account>> {
        self.account_reads.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.read().await;
        Ok(tables.accounts.get(&id).filter(|a| !a.is_deleted()).cloned())
    }

    async fn account_by_identifier(&self, identifier: &Identifier) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .filter(|a| !a.is_deleted() && identifier.matches(a))
            .max_by_key(|a| a.id)
            .cloned())
    }

    async fn resource_ids_for_role(
        &self,
        role_id: i64,
        include_unassignable: bool,
    ) -> StoreResult<Vec<i64>> {
        let tables = self.tables.read().await;
        let role_alive = tables
            .roles
            .get(&role_id)
            .is_some_and(|r| r.deleted_at.is_none());
        if !role_alive {
            return Ok(Vec::new());
        }

        let mut ids: Vec<i64> = tables
            .resources
            .values()
            .filter(|r| r.enabled && (include_unassignable || r.assignable))
            .filter(|r| {
                tables
                    .resource_roles
                    .get(&r.id)
                    .is_some_and(|roles| roles.contains(&role_id))
            })
            .map(|r| r.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn permission_codes_for_resources(&self, resource_ids: &[i64]) -> StoreResult<Vec<String>> {
        let tables = self.tables.read().await;
        let codes: BTreeSet<String> = resource_ids
            .iter()
            .filter_map(|id| tables.resource_permissions.get(id))
            .flatten()
            .cloned()
            .collect();
        Ok(codes.into_iter().collect())
    }

    async fn update_password(&self, account_id: i64, password_hash: &str) -> StoreResult<()> {
        if let Some(account) = self.tables.write().await.accounts.get_mut(&account_id) {
            account.password = password_hash.to_string();
        }
        Ok(())
    }

    async fn touch_last_login(&self, account_id: i64, at: DateTime<Utc>) -> StoreResult<()> {
        if let Some(account) = self.tables.write().await.accounts.get_mut(&account_id) {
            account.last_login_at = Some(at);
        }
        Ok(())
    }
}
