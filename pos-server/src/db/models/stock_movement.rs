//! Stock Movement Model (inventory ledger entry)
//!
//! 台账条目一经写入不可变更；`beforeStock` / `currentStock` 由服务端
//! 在每商品锁内计算，客户端提交的快照值一律忽略。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::{MovementType, Timestamp};
use surrealdb::RecordId;

/// Immutable ledger entry matching the store schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub product_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub delta: i64,
    pub before_stock: i64,
    pub current_stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    pub operator: String,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_no: Option<String>,
}

/// Record movement payload
///
/// Unknown fields (older clients still send `productName` and
/// `currentStock`) are accepted and ignored; the authoritative snapshot
/// is computed server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementCreate {
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub delta: i64,
    #[serde(default)]
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub reference_no: Option<String>,
}
