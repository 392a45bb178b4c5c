use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{PermissionType, ResourceSubType, ResourceType, Status, TokenScene};

/// 用户
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub phone: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_staff: bool,
    pub is_super_admin: bool,
    pub status: Status,
    pub role_id: i64,
    pub last_login_at: Option<DateTime<Utc>>,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    /// None 表示未删除
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 可以登录、可以被 token 解析
    pub fn is_active(&self) -> bool {
        !self.is_deleted() && self.status == Status::Enable
    }

    /// 距上一次登录天数，从未登录为 None
    pub fn days_from_last_login(&self) -> Option<i64> {
        self.last_login_at
            .map(|at| (Utc::now() - at).num_days())
    }
}

/// 角色
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub label: String,
    pub remark: Option<String>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 系统资源
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    /// {parent}:{current}
    pub code: String,
    pub label: String,
    pub front_route: Option<String>,
    pub resource_type: ResourceType,
    pub sub_resource_type: ResourceSubType,
    pub order_num: i32,
    pub enabled: bool,
    pub assignable: bool,
    pub parent_id: Option<i64>,
    pub scene: TokenScene,
}

/// 权限
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub code: String,
    pub label: String,
    pub permission_type: PermissionType,
    pub is_deprecated: bool,
}
