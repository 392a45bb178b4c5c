use axum::{
    Json,
    extract::{Extension, Path, State},
};
use tracing::info;

use crate::{
    AppState,
    auth::Identity,
    database::models::Account,
    error::AppError,
    result::ApiResponse,
    routes::auth::AccountDetail,
    utils::success_to_api_response,
};

use super::model::PermissionCodesResponse;

async fn load_account(state: &AppState, account_id: i64) -> Result<Account, AppError> {
    state
        .store
        .account_by_id(account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("账户不存在".to_string()))
}

/// 账户详情，受接口权限控制
#[axum::debug_handler]
pub async fn account_detail(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<ApiResponse<AccountDetail>>, AppError> {
    let account = load_account(&state, account_id).await?;
    Ok(success_to_api_response(account.into()))
}

/// 按当前角色配置推导的权限码，不读缓存
#[axum::debug_handler]
pub async fn permission_codes(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<ApiResponse<PermissionCodesResponse>>, AppError> {
    let account = load_account(&state, account_id).await?;
    let codes = state.permissions.permission_codes(&account).await?;
    Ok(success_to_api_response(PermissionCodesResponse { account_id, codes }))
}

/// 重建账户权限集合
#[axum::debug_handler]
pub async fn refresh_permissions(
    State(state): State<AppState>,
    Extension(operator): Extension<Identity>,
    Path(account_id): Path<i64>,
) -> Result<Json<ApiResponse<PermissionCodesResponse>>, AppError> {
    let account = load_account(&state, account_id).await?;
    let codes = state.permissions.rebuild(&account).await?;
    info!(
        "Account {} refreshed permissions of {}",
        operator.account_id(),
        account_id
    );
    Ok(success_to_api_response(PermissionCodesResponse { account_id, codes }))
}
