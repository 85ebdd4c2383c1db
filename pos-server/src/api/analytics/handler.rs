//! Analytics API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::DailySummary;
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};
use shared::OrderStatus;

/// Query params for the sales summary
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// 时间窗下界 (Unix 秒，含)
    pub start_ts: i64,
    /// 时间窗上界 (Unix 秒，含)
    pub end_ts: i64,
    /// 状态过滤，缺省只统计 COMPLETED；传 ALL 统计全部状态
    pub status: Option<String>,
}

/// GET /api/analytics/sales-summary - 按 UTC 自然日汇总销售额
///
/// 返回升序日期桶 `{date, orderCount, gross}`；没有订单的日期不补零；
/// 起止倒置返回空表。缺省只统计已完成订单，传 `status=ALL` 统计全部状态。
pub async fn sales_summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<Vec<DailySummary>>> {
    let status = match query.status.as_deref() {
        None => Some(OrderStatus::Completed),
        Some(value) if value.eq_ignore_ascii_case("ALL") => None,
        Some(value) => Some(
            OrderStatus::parse(value)
                .ok_or_else(|| AppError::validation(format!("Unknown order status: {}", value)))?,
        ),
    };

    let repo = OrderRepository::new(
        state.get_db(),
        state.stock_locks.clone(),
        state.config.auto_stock_deduction,
    );
    let summary = repo.daily_summary(query.start_ts, query.end_ts, status).await?;
    Ok(Json(summary))
}
