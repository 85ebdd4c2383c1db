//! Order Aggregate Models
//!
//! 订单聚合根：Order 是头，OrderLine 是从属行，二者只在同一个事务里
//! 一起创建 (见 `OrderRepository::create`)。`total` / `totalCost` 由行数据
//! 推导，客户端提交的汇总一律不信任。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::{OrderStatus, OrderType, Timestamp};
use surrealdb::RecordId;
use validator::Validate;

/// Order header matching the store schema
///
/// `totalCost` is absent (not zero) when no line carried a cost price,
/// so "cost unknown" stays distinguishable from "zero cost".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub order_no: String,
    pub table_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<Timestamp>,
    pub timestamp: Timestamp,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

/// Order line matching the store schema
///
/// Carries a denormalized product snapshot (name/price/cost/unit/image)
/// taken at sale time, so later product edits never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(rename = "orderId", with = "serde_helpers::record_id")]
    pub order: RecordId,
    /// 行序号，保证查询返回顺序与下单顺序一致
    pub line_no: i64,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub unit: String,
    pub quantity: i64,
    pub subtotal: f64,
}

/// Order header plus its materialized lines, the shape handed to clients
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}

/// One calendar day of sales (UTC bucket)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// `%Y-%m-%d` label derived from the order timestamp
    pub date: String,
    pub order_count: i64,
    pub gross: f64,
}

/// 下单请求里的单行商品
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineCreate {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    pub unit: String,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    #[validate(length(min = 1, max = 100))]
    pub order_no: String,
    #[validate(length(min = 1, max = 100))]
    pub table_id: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[validate(length(min = 1, message = "order requires at least one line"))]
    pub items: Vec<OrderLineCreate>,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub paid_at: Option<Timestamp>,
    pub timestamp: Timestamp,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
}
