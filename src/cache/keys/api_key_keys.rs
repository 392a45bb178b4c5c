/// ApiKey 密钥前缀
const SECRET_KEY_PREFIX: &str = "ApiKey:SecretKey:";

/// ApiKey 接口权限集合前缀
const APIS_PREFIX: &str = "ApiKey:Apis:";

pub fn api_key_secret_key(api_key: &str) -> String {
    format!("{}{}", SECRET_KEY_PREFIX, api_key)
}

pub fn api_key_apis_key(api_key: &str) -> String {
    format!("{}{}", APIS_PREFIX, api_key)
}
