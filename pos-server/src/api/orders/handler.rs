//! Order API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OrderCreate, OrderWithLines};
use crate::db::repository::OrderRepository;
use crate::utils::money::{validate_optional_price, validate_price, validate_quantity};
use crate::utils::{AppError, AppResult};
use shared::OrderStatus;

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 按状态过滤 (PENDING / COMPLETED / CANCELLED / REFUNDED)，缺省为全部
    pub status: Option<String>,
}

fn order_repo(state: &ServerState) -> OrderRepository {
    OrderRepository::new(
        state.get_db(),
        state.stock_locks.clone(),
        state.config.auto_stock_deduction,
    )
}

/// GET /api/orders - 获取订单列表 (新单在前，含订单行)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderWithLines>>> {
    let status = match query.status.as_deref() {
        Some(value) => Some(
            OrderStatus::parse(value)
                .ok_or_else(|| AppError::validation(format!("Unknown order status: {}", value)))?,
        ),
        None => None,
    };

    let repo = order_repo(&state);
    let orders = repo.list_with_lines(status).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单 (含订单行)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderWithLines>> {
    let repo = order_repo(&state);
    let order = repo
        .find_with_lines(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// POST /api/orders - 创建订单
///
/// 订单头和全部订单行在同一事务写入；`total` / `totalCost` 服务端重算，
/// 单号重复返回 409。操作员缺省为当前登录用户。
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(mut payload): Json<OrderCreate>,
) -> AppResult<Json<OrderWithLines>> {
    payload.validate()?;

    for line in &payload.items {
        validate_price(line.price, "price")?;
        validate_optional_price(line.cost_price, "costPrice")?;
        validate_quantity(line.quantity)?;
    }
    validate_optional_price(payload.discount, "discount")?;

    // Operator defaults to the authenticated user
    if payload.operator.is_none() {
        payload.operator = Some(current_user.username.clone());
    }

    let repo = order_repo(&state);
    let order = repo.create(payload).await?;

    tracing::info!(
        order_no = %order.order.order_no,
        total = order.order.total,
        lines = order.items.len(),
        "Order created"
    );

    Ok(Json(order))
}
