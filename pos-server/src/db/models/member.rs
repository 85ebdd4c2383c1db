//! Member Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::{MemberType, Timestamp};
use surrealdb::RecordId;

/// Member model matching the store schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub phone: String,
    #[serde(rename = "type", default)]
    pub member_type: MemberType,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub points: i64,
    #[serde(default = "default_level")]
    pub level: i64,
    pub join_date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn default_level() -> i64 {
    1
}

/// Create member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCreate {
    pub name: String,
    pub phone: String,
    #[serde(rename = "type", default)]
    pub member_type: MemberType,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}
