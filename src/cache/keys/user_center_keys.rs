use crate::database::models::{SendCodeScene, TokenScene};

/// token -> "{account_id}:{scene}"
const TOKEN_PREFIX: &str = "UC:Token:";

/// 账户接口权限集合
const ACCOUNT_APIS_PREFIX: &str = "UC:Account:Apis:";

/// 账户在某场景下当前的 token
const ACCOUNT_PREFIX: &str = "UC:Account:";

/// 验证码
const CODE_PREFIX: &str = "UC:Code:";

/// 生成会话缓存键
pub fn token_key(token: &str) -> String {
    format!("{}{}", TOKEN_PREFIX, token)
}

/// 生成账户权限集合键
pub fn account_apis_key(account_id: i64) -> String {
    format!("{}{}", ACCOUNT_APIS_PREFIX, account_id)
}

/// 生成 账户+场景 -> token 的反向键
pub fn account_token_key(account_id: i64, scene: TokenScene) -> String {
    format!("{}{}:{}", ACCOUNT_PREFIX, account_id, scene.as_str())
}

/// 生成验证码键
pub fn code_key(scene: SendCodeScene, identifier: &str) -> String {
    format!("{}{}:{}", CODE_PREFIX, scene.as_str(), identifier)
}

/// 会话值 "{account_id}:{scene}"
pub fn session_value(account_id: i64, scene: TokenScene) -> String {
    format!("{}:{}", account_id, scene.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats_are_stable() {
        assert_eq!(token_key("abc"), "UC:Token:abc");
        assert_eq!(account_apis_key(42), "UC:Account:Apis:42");
        assert_eq!(account_token_key(42, TokenScene::Web), "UC:Account:42:Web");
        assert_eq!(
            code_key(SendCodeScene::ResetPassword, "42"),
            "UC:Code:reset_password:42"
        );
        assert_eq!(session_value(42, TokenScene::Wmp), "42:WMP");
    }
}
