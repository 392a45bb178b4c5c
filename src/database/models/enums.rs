use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 为枚举生成 值 <-> 显示文本 的映射
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => ($value:literal, $label:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $value)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(UnknownVariant(s.to_string())),
                }
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知的枚举值: {0}")]
pub struct UnknownVariant(pub String);

labeled_enum! {
    /// token 场景
    TokenScene {
        General => ("General", "通用"),
        Web => ("Web", "网页端"),
        Mobile => ("Mobile", "移动端"),
        Ios => ("Ios", "Ios"),
        Android => ("Android", "Android"),
        Wmp => ("WMP", "微信小程序"),
        Unknown => ("Unknown", "未知"),
    }
}

labeled_enum! {
    /// 启用状态
    Status {
        Enable => ("enable", "启用"),
        Disable => ("disable", "禁用"),
    }
}

labeled_enum! {
    PermissionType {
        Api => ("api", "API"),
    }
}

labeled_enum! {
    /// 系统资源类型
    ResourceType {
        Menu => ("menu", "菜单"),
        Button => ("button", "按钮"),
        Api => ("api", "接口"),
    }
}

labeled_enum! {
    ResourceSubType {
        AddTab => ("add_tab", "选项卡"),
        Dialog => ("dialog", "弹窗"),
        Ajax => ("ajax", "Ajax请求"),
        Link => ("link", "链接"),
    }
}

labeled_enum! {
    /// 验证码发送场景
    SendCodeScene {
        Login => ("login", "登录"),
        ResetPassword => ("reset_password", "重置密码"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_round_trips_through_wire_value() {
        for scene in TokenScene::ALL {
            assert_eq!(scene.as_str().parse::<TokenScene>(), Ok(*scene));
        }
        assert_eq!(TokenScene::Wmp.as_str(), "WMP");
        assert_eq!(TokenScene::Wmp.label(), "微信小程序");
    }

    #[test]
    fn unknown_value_is_rejected() {
        assert!("web".parse::<TokenScene>().is_err());
        assert!("enabled".parse::<Status>().is_err());
    }

    #[test]
    fn serde_uses_wire_value() {
        let json = serde_json::to_string(&SendCodeScene::ResetPassword).unwrap();
        assert_eq!(json, "\"reset_password\"");
        let scene: TokenScene = serde_json::from_str("\"Mobile\"").unwrap();
        assert_eq!(scene, TokenScene::Mobile);
    }
}
