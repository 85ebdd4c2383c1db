//! 桌台接口
//!
//! 状态流转 (空闲/占用/预订) 走 PUT 的部分更新，没有单独的
//! 开台/清台接口。

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use crate::db::repository::DiningTableRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

fn check_capacity(capacity: i64) -> AppResult<()> {
    if capacity <= 0 {
        return Err(AppError::validation("capacity must be positive"));
    }
    Ok(())
}

/// GET /api/tables
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/tables/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.get_db());
    let table = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;
    Ok(Json(table))
}

/// POST /api/tables
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    check_capacity(payload.capacity)?;

    let repo = DiningTableRepository::new(state.get_db());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/tables/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(capacity) = payload.capacity {
        check_capacity(capacity)?;
    }

    let repo = DiningTableRepository::new(state.get_db());
    Ok(Json(repo.update(&id, payload).await?))
}
