//! Inventory Ledger API Handlers

use axum::{
    Json,
    extract::{Extension, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{StockMovement, StockMovementCreate};
use crate::db::repository::StockLedgerRepository;
use crate::utils::money::validate_optional_price;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::MovementType;

/// Query params for listing ledger entries
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// 按商品过滤 (商品 record id)
    pub product_id: Option<String>,
    /// 按变动类型过滤 (purchase-in / return-in / sale-out / loss-out / adjustment)
    #[serde(rename = "type")]
    pub movement_type: Option<String>,
    /// 时间窗下界 (Unix 秒，含)
    pub start_ts: Option<i64>,
    /// 时间窗上界 (Unix 秒，含)
    pub end_ts: Option<i64>,
}

/// GET /api/inventory/logs - 查询库存流水 (旧单在前)
pub async fn list_logs(
    State(state): State<ServerState>,
    Query(query): Query<LogsQuery>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let movement_type = match query.movement_type.as_deref() {
        Some(value) => Some(MovementType::parse(value).ok_or_else(|| {
            AppError::validation(format!("Unknown movement type: {}", value))
        })?),
        None => None,
    };

    let repo = StockLedgerRepository::new(state.get_db(), state.stock_locks.clone());
    let logs = repo
        .list(query.product_id, movement_type, query.start_ts, query.end_ts)
        .await?;
    Ok(Json(logs))
}

/// POST /api/inventory/logs - 录入库存变动
///
/// delta 符号必须与变动类型一致；`beforeStock` / `currentStock` 由服务端
/// 在商品锁内计算，操作员缺省为当前登录用户。
pub async fn create_log(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<StockMovementCreate>,
) -> AppResult<Json<StockMovement>> {
    validate_optional_price(payload.cost_price, "costPrice")?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let repo = StockLedgerRepository::new(state.get_db(), state.stock_locks.clone());
    let movement = repo
        .record_movement(payload, &current_user.username)
        .await?;

    tracing::info!(
        product_id = %movement.product_id,
        movement_type = %movement.movement_type.as_str(),
        delta = movement.delta,
        current_stock = movement.current_stock,
        "Stock movement recorded"
    );

    Ok(Json(movement))
}
