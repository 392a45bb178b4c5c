use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{Account, TokenScene};

#[derive(Debug, Deserialize)]
pub struct PasswordLoginRequest {
    /// 手机号 / 邮箱 / 用户名
    pub identifier: String,
    pub password: String,
    pub scene: TokenScene,
}

#[derive(Debug, Deserialize)]
pub struct CodeLoginRequest {
    pub identifier: String,
    pub code: String,
    pub scene: TokenScene,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub account: Account,
    pub token: String,
    pub expired_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AccountDetail {
    #[serde(flatten)]
    pub account: Account,
    pub days_from_last_login: Option<i64>,
}

impl From<Account> for AccountDetail {
    fn from(account: Account) -> Self {
        Self {
            days_from_last_login: account.days_from_last_login(),
            account,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub identifier: String,
    pub code: String,
    pub password: String,
}
