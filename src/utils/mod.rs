use axum::Json;
use bcrypt::{DEFAULT_COST, hash, verify};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use uuid::Uuid;

use crate::result::ApiResponse;

type HmacSha256 = Hmac<Sha256>;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

const PASSWORD_SPECIALS: &str = "!@#$%^&*()\":<>,.';~-?/·";

/// 密码规则：8-20 位，只能包含字母、数字和指定符号，且至少包含其中三类
pub fn is_strong_password(password: &str) -> bool {
    let len = password.chars().count();
    if !(8..=20).contains(&len) {
        return false;
    }

    let (mut upper, mut lower, mut digit, mut special) = (false, false, false, false);
    for c in password.chars() {
        match c {
            'A'..='Z' => upper = true,
            'a'..='z' => lower = true,
            '0'..='9' => digit = true,
            c if PASSWORD_SPECIALS.contains(c) => special = true,
            _ => return false,
        }
    }
    [upper, lower, digit, special].iter().filter(|b| **b).count() >= 3
}

/// 生成不透明的登录 token（32 位十六进制）
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// HMAC-SHA256，十六进制小写
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// 常量时间比较签名，签名不是合法十六进制时直接返回 false
pub fn verify_hmac_sha256_hex(secret: &str, payload: &str, sign: &str) -> bool {
    let Ok(expected) = hex::decode(sign.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

pub fn error_to_api_response<T: Serialize>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse::error(code, msg))
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const AUTH_FAILED: i32 = 1002;
    pub const NOT_FOUND: i32 = 1004;
    pub const RATE_LIMIT: i32 = 429;
    pub const INTERNAL_ERROR: i32 = 500;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hashed = hash_password("Abcdef12").unwrap();
        assert!(verify_password("Abcdef12", &hashed).unwrap());
        assert!(!verify_password("Abcdef13", &hashed).unwrap());
    }

    #[test]
    fn password_strength() {
        assert!(is_strong_password("Abcdef12"));
        assert!(is_strong_password("abc!def1"));
        // 只有两类字符
        assert!(!is_strong_password("abcdef12"));
        assert!(!is_strong_password("ABCDEFab"));
        // 长度
        assert!(!is_strong_password("Ab1!"));
        assert!(!is_strong_password("Abcdef12Abcdef12Abcd1"));
        // 非法字符
        assert!(!is_strong_password("Abcdef12 "));
    }

    #[test]
    fn tokens_are_opaque_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn hmac_matches_known_vector() {
        // RFC 4231 test case 2
        assert_eq!(
            hmac_sha256_hex("Jefe", "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn hmac_verify() {
        let sign = hmac_sha256_hex("secret", "key&1700000000");
        assert!(verify_hmac_sha256_hex("secret", "key&1700000000", &sign));
        assert!(verify_hmac_sha256_hex("secret", "key&1700000000", &sign.to_uppercase()));
        assert!(!verify_hmac_sha256_hex("secret", "key&1700000001", &sign));
        assert!(!verify_hmac_sha256_hex("secret", "key&1700000000", "not-hex"));
    }
}
