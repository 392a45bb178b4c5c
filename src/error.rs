use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::auth::{AuthError, LoginError, RebuildError};
use crate::database::StoreError;
use crate::utils::{error_codes, error_to_api_response};

/// 路由层错误，统一转换为 `{code, msg}` 响应
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Login(LoginError),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        if e.is_internal() {
            AppError::Internal(e.to_string())
        } else if matches!(e, LoginError::WeakPassword) {
            AppError::Validation(e.to_string())
        } else {
            AppError::Login(e)
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<RebuildError> for AppError {
    fn from(e: RebuildError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 业务失败沿用 200 + 错误码
        let (status, code, msg) = match self {
            AppError::Auth(e) => return e.into_response(),
            AppError::Login(e) => (StatusCode::OK, error_codes::AUTH_FAILED, e.to_string()),
            AppError::Validation(msg) => (StatusCode::OK, error_codes::VALIDATION_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::OK, error_codes::NOT_FOUND, msg),
            AppError::Internal(cause) => {
                error!("Internal error: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    "网络繁忙，请稍后再试".to_string(),
                )
            }
        };

        (status, error_to_api_response::<()>(code, msg)).into_response()
    }
}
