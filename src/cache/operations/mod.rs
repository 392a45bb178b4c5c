/// 缓存操作
/// 提供缓存操作的功能实现

// 会话缓存操作
pub mod session;

// 权限集合缓存操作
pub mod permission;

// 验证码
pub mod code;

// 重新导出常用操作
pub use code::CodeCacheOperations;
pub use permission::PermissionCacheOperations;
pub use session::{SessionCacheOperations, SessionEntry};
