//! 单元测试共用的账户、角色与资源数据

use std::sync::Arc;

use chrono::Utc;

use crate::cache::MemoryCache;
use crate::cache::operations::SessionCacheOperations;
use crate::database::MemoryCredentialStore;
use crate::database::models::{Account, Resource, ResourceSubType, ResourceType, Role, Status, TokenScene};

pub const SERVICE: &str = "UserCenter";
pub const PASSWORD: &str = "Abcdef12";

pub const SUPER_ADMIN_ID: i64 = 1;
pub const STAFF_ID: i64 = 2;
pub const MEMBER_ID: i64 = 3;

pub const ROLE_ID: i64 = 10;
pub const ASSIGNABLE_RESOURCE_ID: i64 = 100;
pub const STAFF_ONLY_RESOURCE_ID: i64 = 101;

pub const MEMBER_CODE: &str = "UserCenter:GET:/user/v1/accounts/{id}";
pub const STAFF_ONLY_CODE: &str = "UserCenter:POST:/user/v1/accounts/{id}/permissions/refresh";

pub fn account(id: i64, username: &str, phone: &str) -> Account {
    Account {
        id,
        username: username.to_string(),
        phone: phone.to_string(),
        email: Some(format!("{}@example.com", username)),
        password: bcrypt::hash(PASSWORD, 4).unwrap(),
        is_staff: false,
        is_super_admin: false,
        status: Status::Enable,
        role_id: ROLE_ID,
        last_login_at: None,
        remark: String::new(),
        created_at: Utc::now(),
        deleted_at: None,
    }
}

pub fn resource(id: i64, code: &str, assignable: bool) -> Resource {
    Resource {
        id,
        code: code.to_string(),
        label: code.to_string(),
        front_route: None,
        resource_type: ResourceType::Api,
        sub_resource_type: ResourceSubType::Ajax,
        order_num: 0,
        enabled: true,
        assignable,
        parent_id: None,
        scene: TokenScene::General,
    }
}

pub struct Fixture {
    pub cache: Arc<MemoryCache>,
    pub store: Arc<MemoryCredentialStore>,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = MemoryCredentialStore::new();

        let mut admin = account(SUPER_ADMIN_ID, "admin", "13800000001");
        admin.is_super_admin = true;
        admin.is_staff = true;
        let mut staff = account(STAFF_ID, "staff", "13800000002");
        staff.is_staff = true;
        store.insert_account(admin).await;
        store.insert_account(staff).await;
        store.insert_account(account(MEMBER_ID, "member", "13800000003")).await;

        store
            .insert_role(Role {
                id: ROLE_ID,
                label: "运营".into(),
                remark: None,
                deleted_at: None,
            })
            .await;
        store
            .insert_resource(resource(ASSIGNABLE_RESOURCE_ID, "account:detail", true), &[ROLE_ID], &[MEMBER_CODE])
            .await;
        store
            .insert_resource(
                resource(STAFF_ONLY_RESOURCE_ID, "account:refresh", false),
                &[ROLE_ID],
                &[STAFF_ONLY_CODE],
            )
            .await;

        Self {
            cache: Arc::new(MemoryCache::new()),
            store: Arc::new(store),
        }
    }

    /// 直接写入会话，跳过密码校验
    pub async fn login_token(&self, account_id: i64, scene: TokenScene, token: &str) {
        SessionCacheOperations::issue(self.cache.as_ref(), account_id, scene, token, 3600)
            .await
            .unwrap();
    }

    pub async fn account(&self, id: i64) -> Account {
        use crate::database::CredentialStore;
        self.store.account_by_id(id).await.unwrap().unwrap()
    }
}
