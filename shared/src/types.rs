//! 跨端共享的基础类型

use serde::{Deserialize, Serialize};

/// Unix 时间戳 (UTC 秒)
pub type Timestamp = i64;

/// 单条权限，形如 `resource:action`
///
/// 三种匹配：精确 (`product:view`)、资源级通配 (`product:*`)、
/// 全局通配 (`*` 或 `all`)。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission(pub String);

impl Permission {
    pub fn grants(&self, action: &str) -> bool {
        let held = self.0.as_str();
        if held == "*" || held == "all" {
            return true;
        }
        match held.strip_suffix(":*") {
            Some(resource) => action.starts_with(resource),
            None => held == action,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
