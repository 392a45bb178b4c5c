// 鉴权模块
// token 校验、接口权限、ApiKey 签名、登录会话

pub mod api_key;
pub mod bearer;
pub mod error;
pub mod identity;
pub mod permission;
pub mod session;
pub mod validator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use api_key::ApiKeyChecker;
pub use error::{AuthError, RebuildError};
pub use identity::{ApiCaller, Identity, RouteSignature};
pub use permission::{PermissionChecker, require_staff, require_super_admin};
pub use session::{IssuedSession, LoginError, SessionService};
pub use validator::TokenValidator;
