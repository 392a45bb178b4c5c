use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::Utc;
use tracing::{error, warn};

use super::error::AuthError;
use super::identity::{ApiCaller, RouteSignature};
use crate::cache::KvCache;
use crate::cache::keys::api_key_secret_key;
use crate::cache::operations::PermissionCacheOperations;
use crate::utils::verify_hmac_sha256_hex;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
pub const SIGN_HEADER: &str = "x-sign";

/// 签名载荷 "{api_key}&{timestamp}"
pub fn sign_payload(api_key: &str, timestamp: i64) -> String {
    format!("{}&{}", api_key, timestamp)
}

/// 服务间调用的 ApiKey + HMAC 签名校验
pub struct ApiKeyChecker {
    cache: Arc<dyn KvCache>,
    service_code: String,
    window_secs: i64,
}

impl ApiKeyChecker {
    pub fn new(cache: Arc<dyn KvCache>, service_code: impl Into<String>, window_secs: i64) -> Self {
        Self {
            cache,
            service_code: service_code.into(),
            window_secs,
        }
    }

    pub async fn check(&self, headers: &HeaderMap, route: &RouteSignature) -> Result<ApiCaller, AuthError> {
        self.check_at(headers, route, Utc::now().timestamp()).await
    }

    /// `now` 为 unix 秒
    pub async fn check_at(
        &self,
        headers: &HeaderMap,
        route: &RouteSignature,
        now: i64,
    ) -> Result<ApiCaller, AuthError> {
        self.verify(headers, route, now).await.inspect_err(|e| {
            warn!("ApiKey校验失败: kind={} {} {}", e.kind(), route.method, route.path);
        })
    }

    async fn verify(
        &self,
        headers: &HeaderMap,
        route: &RouteSignature,
        now: i64,
    ) -> Result<ApiCaller, AuthError> {
        let api_key = header_str(headers, API_KEY_HEADER).ok_or(AuthError::ApiKeyInvalid)?;
        let timestamp: i64 = header_str(headers, TIMESTAMP_HEADER)
            .and_then(|v| v.parse().ok())
            .ok_or(AuthError::ApiKeyInvalid)?;
        let sign = header_str(headers, SIGN_HEADER).ok_or(AuthError::ApiKeyInvalid)?;

        if now.abs_diff(timestamp) > self.window_secs.unsigned_abs() {
            return Err(AuthError::TimestampExpired);
        }

        let secret = self
            .cache
            .get(&api_key_secret_key(api_key))
            .await
            .map_err(|e| {
                error!("ApiKey secret lookup failed: {}", e);
                AuthError::ApiKeyInvalid
            })?
            .ok_or(AuthError::ApiKeyInvalid)?;

        if !verify_hmac_sha256_hex(&secret, &sign_payload(api_key, timestamp), sign) {
            return Err(AuthError::SignatureMismatch);
        }

        // ApiKey 不接受全局通配 "*"
        let candidates = vec![
            format!("{}:*", self.service_code),
            route.permission_code(&self.service_code),
        ];
        let allowed = PermissionCacheOperations::api_key_has_any(self.cache.as_ref(), api_key, &candidates)
            .await
            .map_err(|e| {
                error!("ApiKey permission lookup failed: {}", e);
                AuthError::Forbidden
            })?;
        if !allowed {
            return Err(AuthError::Forbidden);
        }

        Ok(ApiCaller {
            api_key: api_key.to_string(),
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
