use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    cache::{KvCache, keys::rate_limit_key},
    config::Config,
    utils::{error_codes, error_to_api_response},
};

/// 按客户端 IP 的固定窗口限流
#[derive(Clone)]
pub struct RateLimiter {
    cache: Arc<dyn KvCache>,
    window_secs: u64,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(cache: Arc<dyn KvCache>, config: &Config) -> Self {
        Self {
            cache,
            window_secs: config.rate_limit_window().as_secs(),
            max_requests: config.rate_limit_requests,
        }
    }

    pub async fn check_rate_limit(self: Arc<Self>, req: Request<Body>, next: Next) -> Response {
        // 从连接信息获取原始IP
        let remote_ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string());
        let ip = client_ip(&req, remote_ip.as_deref());

        let count = match self.cache.incr_window(&rate_limit_key(&ip), self.window_secs).await {
            Ok(count) => count,
            Err(e) => {
                // 限流不参与鉴权决策，缓存故障时放行
                tracing::error!("Rate limit counter unavailable: {}", e);
                return next.run(req).await;
            }
        };

        if count > i64::from(self.max_requests) {
            tracing::warn!("Rate limited: ip={} count={}", ip, count);
            return (
                StatusCode::OK,
                error_to_api_response::<()>(
                    error_codes::RATE_LIMIT,
                    format!("请求过于频繁，请在{}秒后重试", self.window_secs),
                ),
            )
                .into_response();
        }

        next.run(req).await
    }
}

/// x-real-ip -> x-forwarded-for 第一个非空值 -> 连接地址
fn client_ip(req: &Request<Body>, remote_ip: Option<&str>) -> String {
    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip)
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    limiter.check_rate_limit(req, next).await
}
