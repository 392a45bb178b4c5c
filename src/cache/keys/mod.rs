/// 缓存键模块
/// 键格式需与现有部署保持一致

// 用户中心缓存键
pub mod user_center_keys;

// ApiKey 缓存键
pub mod api_key_keys;

pub use api_key_keys::{api_key_apis_key, api_key_secret_key};
pub use user_center_keys::{
    account_apis_key, account_token_key, code_key, session_value, token_key,
};

/// 生成限流计数键
pub fn rate_limit_key(ip: &str) -> String {
    format!("rate_limit:{}", ip)
}
