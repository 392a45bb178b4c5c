use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::{FromRow, PgPool};

use crate::database::models::{Account, Status, UnknownVariant};

static PHONE_REGEX_CN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("valid phone regex"));
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("valid email regex")
});
static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{4,20}$").expect("valid username regex"));

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database call timed out")]
    Timeout,
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<UnknownVariant> for StoreError {
    fn from(e: UnknownVariant) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 登录标识：手机号 / 邮箱 / 用户名
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Phone(String),
    Email(String),
    Username(String),
}

impl Identifier {
    /// 按 手机号 -> 邮箱 -> 用户名 的顺序识别，都不匹配返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if PHONE_REGEX_CN.is_match(raw) {
            Some(Identifier::Phone(raw.to_string()))
        } else if EMAIL_REGEX.is_match(raw) {
            Some(Identifier::Email(raw.to_string()))
        } else if USERNAME_REGEX.is_match(raw) && !raw.chars().all(|c| c.is_ascii_digit()) {
            // 用户名不能是纯数字
            Some(Identifier::Username(raw.to_string()))
        } else {
            None
        }
    }

    pub fn matches(&self, account: &Account) -> bool {
        match self {
            Identifier::Phone(v) => account.phone == *v,
            Identifier::Email(v) => account.email.as_deref() == Some(v.as_str()),
            Identifier::Username(v) => account.username == *v,
        }
    }
}

/// 账户凭据存储，所有查询都排除软删除记录
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn account_by_id(&self, id: i64) -> StoreResult<Option<Account>>;

    async fn account_by_identifier(&self, identifier: &Identifier) -> StoreResult<Option<Account>>;

    /// 角色关联的可用资源 id；`include_unassignable` 为 false 时只返回可分配资源
    async fn resource_ids_for_role(
        &self,
        role_id: i64,
        include_unassignable: bool,
    ) -> StoreResult<Vec<i64>>;

    async fn permission_codes_for_resources(&self, resource_ids: &[i64]) -> StoreResult<Vec<String>>;

    async fn update_password(&self, account_id: i64, password_hash: &str) -> StoreResult<()>;

    async fn touch_last_login(&self, account_id: i64, at: DateTime<Utc>) -> StoreResult<()>;
}

/// account 表原始行，deleted_at 为 0 表示未删除
#[derive(Debug, FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    phone: String,
    email: Option<String>,
    password: String,
    is_staff: bool,
    is_super_admin: bool,
    status: String,
    role_id: i64,
    last_login_at: Option<DateTime<Utc>>,
    remark: String,
    created_at: DateTime<Utc>,
    deleted_at: i64,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let deleted_at = match row.deleted_at {
            0 => None,
            ts => Some(
                DateTime::from_timestamp(ts, 0)
                    .ok_or_else(|| StoreError::Corrupt(format!("deleted_at {}", ts)))?,
            ),
        };
        Ok(Account {
            id: row.id,
            username: row.username,
            phone: row.phone,
            email: row.email,
            password: row.password,
            is_staff: row.is_staff,
            is_super_admin: row.is_super_admin,
            status: row.status.parse::<Status>()?,
            role_id: row.role_id,
            last_login_at: row.last_login_at,
            remark: row.remark,
            created_at: row.created_at,
            deleted_at,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, phone, email, password, is_staff, is_super_admin, \
     status, role_id, last_login_at, remark, created_at, deleted_at";

/// PostgreSQL 实现
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(StoreError::Timeout),
        }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn account_by_id(&self, id: i64) -> StoreResult<Option<Account>> {
        let sql = format!(
            "SELECT {} FROM account WHERE id = $1 AND deleted_at = 0",
            ACCOUNT_COLUMNS
        );
        let row = self
            .bounded(
                sqlx::query_as::<_, AccountRow>(&sql)
                    .bind(id)
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Account::try_from).transpose()
    }

    async fn account_by_identifier(&self, identifier: &Identifier) -> StoreResult<Option<Account>> {
        let (column, value) = match identifier {
            Identifier::Phone(v) => ("phone", v),
            Identifier::Email(v) => ("email", v),
            Identifier::Username(v) => ("username", v),
        };
        let sql = format!(
            "SELECT {} FROM account WHERE {} = $1 AND deleted_at = 0 ORDER BY id DESC LIMIT 1",
            ACCOUNT_COLUMNS, column
        );
        let row = self
            .bounded(
                sqlx::query_as::<_, AccountRow>(&sql)
                    .bind(value)
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Account::try_from).transpose()
    }

    async fn resource_ids_for_role(
        &self,
        role_id: i64,
        include_unassignable: bool,
    ) -> StoreResult<Vec<i64>> {
        let ids = self
            .bounded(
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT r.id
                    FROM resource r
                    JOIN resource_role rr ON rr.resource_id = r.id
                    JOIN role ro ON ro.id = rr.role_id AND ro.deleted_at = 0
                    WHERE rr.role_id = $1
                      AND r.enabled
                      AND ($2 OR r.assignable)
                    ORDER BY r.id
                    "#,
                )
                .bind(role_id)
                .bind(include_unassignable)
                .fetch_all(&self.pool),
            )
            .await?;

        Ok(ids)
    }

    async fn permission_codes_for_resources(&self, resource_ids: &[i64]) -> StoreResult<Vec<String>> {
        if resource_ids.is_empty() {
            return Ok(Vec::new());
        }
        let codes = self
            .bounded(
                sqlx::query_scalar::<_, String>(
                    r#"
                    SELECT DISTINCT rp.permission_id
                    FROM resource_permission rp
                    WHERE rp.resource_id = ANY($1)
                    ORDER BY rp.permission_id
                    "#,
                )
                .bind(resource_ids)
                .fetch_all(&self.pool),
            )
            .await?;

        Ok(codes)
    }

    async fn update_password(&self, account_id: i64, password_hash: &str) -> StoreResult<()> {
        self.bounded(
            sqlx::query(
                "UPDATE account SET password = $1, updated_at = now() WHERE id = $2 AND deleted_at = 0",
            )
            .bind(password_hash)
            .bind(account_id)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn touch_last_login(&self, account_id: i64, at: DateTime<Utc>) -> StoreResult<()> {
        self.bounded(
            sqlx::query("UPDATE account SET last_login_at = $1 WHERE id = $2 AND deleted_at = 0")
                .bind(at)
                .bind(account_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_detection_order() {
        assert_eq!(
            Identifier::parse("13800138000"),
            Some(Identifier::Phone("13800138000".into()))
        );
        assert_eq!(
            Identifier::parse("a.b@example.com"),
            Some(Identifier::Email("a.b@example.com".into()))
        );
        assert_eq!(
            Identifier::parse("admin01"),
            Some(Identifier::Username("admin01".into()))
        );
    }

    #[test]
    fn identifier_rejects_numeric_and_short_usernames() {
        // 纯数字且不是手机号
        assert_eq!(Identifier::parse("12345678"), None);
        assert_eq!(Identifier::parse("abc"), None);
        assert_eq!(Identifier::parse("with space"), None);
    }

    #[test]
    fn row_sentinel_becomes_option() {
        let row = AccountRow {
            id: 1,
            username: "admin01".into(),
            phone: "13800138000".into(),
            email: None,
            password: String::new(),
            is_staff: true,
            is_super_admin: false,
            status: "enable".into(),
            role_id: 1,
            last_login_at: None,
            remark: String::new(),
            created_at: Utc::now(),
            deleted_at: 0,
        };
        let account = Account::try_from(row).unwrap();
        assert!(account.deleted_at.is_none());
        assert!(account.is_active());
    }

    #[test]
    fn row_with_unknown_status_is_corrupt() {
        let row = AccountRow {
            id: 1,
            username: "admin01".into(),
            phone: "13800138000".into(),
            email: None,
            password: String::new(),
            is_staff: false,
            is_super_admin: false,
            status: "frozen".into(),
            role_id: 1,
            last_login_at: None,
            remark: String::new(),
            created_at: Utc::now(),
            deleted_at: 1_700_000_000,
        };
        assert!(matches!(Account::try_from(row), Err(StoreError::Corrupt(_))));
    }
}
