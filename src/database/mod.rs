// 数据库模块
// 包含实体定义、存储抽象及其实现

pub mod memory;
pub mod models; // 数据库实体定义
pub mod repositories; // 存储抽象与 PostgreSQL 实现

// 重新导出常用类型
pub use memory::MemoryCredentialStore;
pub use models::Account;
pub use repositories::{CredentialStore, Identifier, PgCredentialStore, StoreError};
