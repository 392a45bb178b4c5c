use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::cache::CacheError;
use crate::database::StoreError;
use crate::result::ApiResponse;

/// 鉴权失败类型，对当前请求都是终止性的，不重试
///
/// 对外只暴露固定文案与数字码，内部原因只写日志。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("未携带授权头部信息")]
    MissingCredential,
    #[error("授权头部信息无效")]
    MalformedCredential,
    #[error("授权头部信息类型错误")]
    UnsupportedScheme,
    #[error("登录失效或已在其他地方登录")]
    SessionExpiredOrInvalid,
    #[error("token异常使用")]
    SceneMismatch,
    #[error("无效的账户")]
    AccountNotFound,
    #[error("禁止访问")]
    Forbidden,
    // 以下三种对外文案一致，不区分具体哪一步失败
    #[error("无效的ApiKey")]
    ApiKeyInvalid,
    #[error("无效的ApiKey")]
    SignatureMismatch,
    #[error("无效的ApiKey")]
    TimestampExpired,
}

impl AuthError {
    /// 稳定的机器可读类型名，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::MalformedCredential => "malformed_credential",
            AuthError::UnsupportedScheme => "unsupported_scheme",
            AuthError::SessionExpiredOrInvalid => "session_expired_or_invalid",
            AuthError::SceneMismatch => "scene_mismatch",
            AuthError::AccountNotFound => "account_not_found",
            AuthError::Forbidden => "forbidden",
            AuthError::ApiKeyInvalid => "api_key_invalid",
            AuthError::SignatureMismatch => "signature_mismatch",
            AuthError::TimestampExpired => "timestamp_expired",
        }
    }

    /// 响应体中的业务码
    pub fn code(&self) -> i32 {
        match self {
            AuthError::MissingCredential => 40101,
            AuthError::MalformedCredential => 40102,
            AuthError::UnsupportedScheme => 40103,
            AuthError::SessionExpiredOrInvalid => 40104,
            AuthError::SceneMismatch => 40105,
            AuthError::AccountNotFound => 40106,
            AuthError::ApiKeyInvalid | AuthError::SignatureMismatch | AuthError::TimestampExpired => {
                40110
            }
            AuthError::Forbidden => 40300,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::error(self.code(), self.to_string()));
        (self.status(), body).into_response()
    }
}

/// 重建权限集合失败
#[derive(Debug, thiserror::Error)]
pub enum RebuildError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}
