use std::sync::Arc;

use auth::{ApiKeyChecker, PermissionChecker, SessionService, TokenValidator};
use cache::{AccountLocalCache, KvCache};
use config::Config;
use database::CredentialStore;

pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<dyn KvCache>,
    pub store: Arc<dyn CredentialStore>,
    pub validator: Arc<TokenValidator>,
    pub permissions: Arc<PermissionChecker>,
    pub api_keys: Arc<ApiKeyChecker>,
    pub sessions: Arc<SessionService>,
}

impl AppState {
    /// 由缓存与存储后端组装各鉴权组件
    pub fn new(config: Config, cache: Arc<dyn KvCache>, store: Arc<dyn CredentialStore>) -> Self {
        let accounts = AccountLocalCache::new(config.account_cache_capacity, config.account_cache_ttl());
        let validator = Arc::new(TokenValidator::new(cache.clone(), store.clone(), accounts));
        let permissions = Arc::new(PermissionChecker::new(
            cache.clone(),
            store.clone(),
            config.service_code.clone(),
        ));
        let api_keys = Arc::new(ApiKeyChecker::new(
            cache.clone(),
            config.service_code.clone(),
            config.api_key_window_secs,
        ));
        let sessions = Arc::new(SessionService::new(
            cache.clone(),
            store.clone(),
            permissions.clone(),
            config.token_expire_seconds,
        ));

        Self {
            config: Arc::new(config),
            cache,
            store,
            validator,
            permissions,
            api_keys,
            sessions,
        }
    }
}
