//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Reservation, ReservationCreate, ReservationUpdate};
use crate::db::repository::ReservationRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/reservations - 获取所有预订 (按预订时间排序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Reservation>>> {
    let repo = ReservationRepository::new(state.get_db());
    let reservations = repo.find_all().await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.get_db());
    let reservation = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {} not found", id)))?;
    Ok(Json(reservation))
}

/// POST /api/reservations - 创建预订
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    validate_required_text(&payload.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_required_text(&payload.customer_phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.table_id, "tableId", MAX_SHORT_TEXT_LEN)?;
    if payload.guests <= 0 {
        return Err(AppError::validation("guests must be positive"));
    }

    let repo = ReservationRepository::new(state.get_db());
    let reservation = repo.create(payload).await?;
    Ok(Json(reservation))
}

/// PUT /api/reservations/:id - 更新预订 (部分字段)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    if let Some(guests) = payload.guests
        && guests <= 0
    {
        return Err(AppError::validation("guests must be positive"));
    }

    let repo = ReservationRepository::new(state.get_db());
    let reservation = repo.update(&id, payload).await?;
    Ok(Json(reservation))
}
