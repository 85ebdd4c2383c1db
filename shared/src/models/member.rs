//! Member classification

use serde::{Deserialize, Serialize};

/// 会员类型 / Membership tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberType {
    Member,
    Normal,
}

impl Default for MemberType {
    fn default() -> Self {
        MemberType::Normal
    }
}
