//! Supplier API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Supplier, SupplierCreate};
use crate::db::repository::SupplierRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/suppliers - 获取所有供应商
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Supplier>>> {
    let repo = SupplierRepository::new(state.get_db());
    let suppliers = repo.find_all().await?;
    Ok(Json(suppliers))
}

/// GET /api/suppliers/:id - 获取单个供应商
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Supplier>> {
    let repo = SupplierRepository::new(state.get_db());
    let supplier = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Supplier {} not found", id)))?;
    Ok(Json(supplier))
}

/// POST /api/suppliers - 创建供应商
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SupplierCreate>,
) -> AppResult<Json<Supplier>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.contact_name, "contactName", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let repo = SupplierRepository::new(state.get_db());
    let supplier = repo.create(payload).await?;
    Ok(Json(supplier))
}
