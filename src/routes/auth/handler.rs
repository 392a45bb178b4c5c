use axum::{
    Json,
    extract::{Extension, State},
};

use crate::{
    AppState,
    auth::{Identity, IssuedSession},
    error::AppError,
    result::{ApiResponse, EmptyResponse},
    utils::success_to_api_response,
};

use super::model::{
    AccountDetail, ChangePasswordRequest, CodeLoginRequest, LoginResponse, PasswordLoginRequest,
    ResetPasswordRequest,
};

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

impl From<IssuedSession> for LoginResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            account: session.account,
            token: session.token,
            expired_at: session.expired_at,
        }
    }
}

#[axum::debug_handler]
pub async fn login_with_password(
    State(state): State<AppState>,
    Json(req): Json<PasswordLoginRequest>,
) -> ApiResult<LoginResponse> {
    let session = state
        .sessions
        .login_with_password(&req.identifier, &req.password, req.scene)
        .await?;
    Ok(success_to_api_response(session.into()))
}

#[axum::debug_handler]
pub async fn login_with_code(
    State(state): State<AppState>,
    Json(req): Json<CodeLoginRequest>,
) -> ApiResult<LoginResponse> {
    let session = state
        .sessions
        .login_with_code(&req.identifier, &req.code, req.scene)
        .await?;
    Ok(success_to_api_response(session.into()))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<EmptyResponse> {
    state.sessions.logout(&identity).await?;
    Ok(success_to_api_response(EmptyResponse {}))
}

#[axum::debug_handler]
pub async fn myself(Extension(identity): Extension<Identity>) -> ApiResult<AccountDetail> {
    Ok(success_to_api_response(identity.account.into()))
}

#[axum::debug_handler]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<EmptyResponse> {
    state
        .sessions
        .change_password(&identity, &req.old_password, &req.new_password)
        .await?;
    Ok(success_to_api_response(EmptyResponse {}))
}

#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<EmptyResponse> {
    state
        .sessions
        .reset_password(&req.identifier, &req.code, &req.password)
        .await?;
    Ok(success_to_api_response(EmptyResponse {}))
}
