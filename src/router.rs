use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};

use crate::{
    AppState,
    middleware::{
        RateLimiter, api_key_permission_check, api_permission_check, log_errors, rate_limit,
        staff_admin_required, super_admin_required, token_required,
    },
    routes,
};

// 公开路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/login/pwd", post(routes::auth::login_with_password))
        .route("/v1/auth/login/code", post(routes::auth::login_with_code))
        .route("/v1/auth/password/reset", post(routes::auth::reset_password))
}

// 只需要登录的路由
fn session_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/auth/logout", post(routes::auth::logout))
        .route("/v1/auth/myself", get(routes::auth::myself))
        .route("/v1/auth/password/change", post(routes::auth::change_password))
        .route_layer(from_fn_with_state(state.clone(), token_required))
}

// 按接口权限控制的路由
fn permission_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/accounts/{id}", get(routes::account::account_detail))
        .route_layer(from_fn_with_state(state.clone(), api_permission_check))
}

fn staff_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/v1/accounts/{id}/permissions",
            get(routes::account::permission_codes),
        )
        .route_layer(from_fn_with_state(state.clone(), staff_admin_required))
}

fn super_admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/v1/accounts/{id}/permissions/refresh",
            post(routes::account::refresh_permissions),
        )
        .route_layer(from_fn_with_state(state.clone(), super_admin_required))
}

// 服务间调用
fn open_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/open/ping", get(routes::open::ping))
        .route_layer(from_fn_with_state(state.clone(), api_key_permission_check))
}

/// 组装全部路由并挂载到 `api_base_uri` 下
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(session_routes(&state))
        .merge(permission_routes(&state))
        .merge(staff_routes(&state))
        .merge(super_admin_routes(&state))
        .merge(open_routes(&state));

    // 空前缀或 "/" 时不嵌套
    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    let rate_limiter = Arc::new(RateLimiter::new(state.cache.clone(), &state.config));
    router
        .layer(from_fn(log_errors))
        .layer(from_fn_with_state(rate_limiter, rate_limit))
        .with_state(state)
}
