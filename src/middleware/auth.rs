use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    auth::{AuthError, Identity, RouteSignature, require_staff, require_super_admin},
};

/// 当前请求的接口签名，优先使用路由模板而不是实际路径
fn route_signature(state: &AppState, req: &Request<Body>) -> RouteSignature {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str())
        .unwrap_or_else(|| req.uri().path());
    RouteSignature::new(req.method().as_str(), &state.config.api_base_uri, path)
}

// 只借用头部，Body 不是 Sync
async fn identify(state: &AppState, headers: &HeaderMap) -> Result<Identity, AuthError> {
    state
        .validator
        .validate(headers)
        .await
        .inspect_err(|e| tracing::warn!(kind = e.kind(), "token校验失败"))
}

/// 只要求登录
pub async fn token_required(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = identify(&state, req.headers()).await?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// 登录 + 接口权限
pub async fn api_permission_check(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = identify(&state, req.headers()).await?;
    let route = route_signature(&state, &req);
    state.permissions.check(&identity, &route).await?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

pub async fn super_admin_required(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = identify(&state, req.headers()).await?;
    require_super_admin(&identity)?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

pub async fn staff_admin_required(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = identify(&state, req.headers()).await?;
    require_staff(&identity)?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// 服务间调用：ApiKey + 签名 + 接口权限
pub async fn api_key_permission_check(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let route = route_signature(&state, &req);
    let caller = state.api_keys.check(req.headers(), &route).await?;

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
