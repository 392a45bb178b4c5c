use crate::database::models::{Account, TokenScene};

/// token 校验通过后的请求身份，通过 request extensions 显式传递给后续处理
#[derive(Debug, Clone)]
pub struct Identity {
    pub account: Account,
    pub scene: TokenScene,
    pub token: String,
    pub is_staff: bool,
    pub is_super_admin: bool,
}

impl Identity {
    pub fn new(account: Account, scene: TokenScene, token: impl Into<String>) -> Self {
        Self {
            is_staff: account.is_staff,
            is_super_admin: account.is_super_admin,
            account,
            scene,
            token: token.into(),
        }
    }

    pub fn account_id(&self) -> i64 {
        self.account.id
    }
}

/// ApiKey 校验通过后的调用方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCaller {
    pub api_key: String,
}

impl ApiCaller {
    pub const SCENE: &'static str = "ApiCall";
}

/// 当前请求的接口签名：方法 + 挂载前缀 + 路由模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSignature {
    pub method: String,
    pub path: String,
}

impl RouteSignature {
    /// `route_path` 已包含挂载前缀时不再重复拼接
    pub fn new(method: &str, root_path: &str, route_path: &str) -> Self {
        let root_path = root_path.trim_end_matches('/');
        let already_rooted = route_path
            .strip_prefix(root_path)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        let path = if root_path.is_empty() || already_rooted {
            route_path.to_string()
        } else {
            format!("{}{}", root_path, route_path)
        };
        Self {
            method: method.to_ascii_uppercase(),
            path,
        }
    }

    /// {service_code}:{method}:{root_path}{path}
    pub fn permission_code(&self, service_code: &str) -> String {
        format!("{}:{}:{}", service_code, self.method, self.path)
    }
}
