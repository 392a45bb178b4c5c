// 数据库实体定义

pub mod account;
pub mod enums;

pub use account::{Account, Permission, Resource, Role};
pub use enums::{
    PermissionType, ResourceSubType, ResourceType, SendCodeScene, Status, TokenScene,
    UnknownVariant,
};
