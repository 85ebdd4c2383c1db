//! Member API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Member, MemberCreate};
use crate::db::repository::MemberRepository;
use crate::utils::money::validate_optional_price;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/members - 获取所有会员 (按入会时间倒序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Member>>> {
    let repo = MemberRepository::new(state.get_db());
    let members = repo.find_all().await?;
    Ok(Json(members))
}

/// GET /api/members/:id - 获取单个会员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Member>> {
    let repo = MemberRepository::new(state.get_db());
    let member = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {} not found", id)))?;
    Ok(Json(member))
}

/// POST /api/members - 创建会员
///
/// 手机号唯一，重复时返回 Conflict
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MemberCreate>,
) -> AppResult<Json<Member>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_price(payload.balance, "balance")?;

    let repo = MemberRepository::new(state.get_db());
    let member = repo.create(payload).await?;
    Ok(Json(member))
}
