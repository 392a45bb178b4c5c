use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// 路由挂载前缀，同时作为权限码中的 root_path
    pub api_base_uri: String,
    /// 服务编码，权限码前缀
    pub service_code: String,
    pub token_expire_seconds: u64,
    pub account_cache_ttl_secs: u64,
    pub account_cache_capacity: usize,
    pub api_key_window_secs: i64,
    pub cache_timeout_ms: u64,
    pub store_timeout_ms: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: String::new(),
            redis_url: String::new(),
            server_host: "0.0.0.0".into(),
            server_port: 3000,
            api_base_uri: "/user".into(),
            service_code: "UserCenter".into(),
            token_expire_seconds: 3600 * 24 * 7,
            account_cache_ttl_secs: 60,
            account_cache_capacity: 256,
            api_key_window_secs: 30,
            cache_timeout_ms: 500,
            store_timeout_ms: 3000,
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
        }
    }
}

fn var_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: var_or("SERVER_PORT", defaults.server_port),
            api_base_uri: env::var("API_BASE_URI").unwrap_or(defaults.api_base_uri),
            service_code: env::var("SERVICE_CODE").unwrap_or(defaults.service_code),
            token_expire_seconds: var_or("TOKEN_EXPIRE_SECONDS", defaults.token_expire_seconds),
            account_cache_ttl_secs: var_or("ACCOUNT_CACHE_TTL_SECS", defaults.account_cache_ttl_secs),
            account_cache_capacity: var_or("ACCOUNT_CACHE_CAPACITY", defaults.account_cache_capacity),
            api_key_window_secs: var_or("API_KEY_WINDOW_SECS", defaults.api_key_window_secs),
            cache_timeout_ms: var_or("CACHE_TIMEOUT_MS", defaults.cache_timeout_ms),
            store_timeout_ms: var_or("STORE_TIMEOUT_MS", defaults.store_timeout_ms),
            rate_limit_window_secs: var_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window_secs),
            rate_limit_requests: var_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests),
        })
    }

    pub fn account_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.account_cache_ttl_secs)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let config = Config::default();
        assert_eq!(config.api_base_uri, "/user");
        assert_eq!(config.service_code, "UserCenter");
        assert_eq!(config.token_expire_seconds, 604_800);
        assert_eq!(config.account_cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.account_cache_capacity, 256);
        assert_eq!(config.api_key_window_secs, 30);
    }

    #[test]
    fn unparsable_values_fall_back() {
        assert_eq!(var_or("USER_CENTER_SURELY_UNSET_VAR", 7u16), 7);
    }
}
