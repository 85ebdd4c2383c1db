//! AI 经营助手 API Handlers
//!
//! 失败兜底在 [`AiService`](crate::services::AiService) 内完成，
//! 这里的接口永远返回 200。

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::services::AiStatus;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    /// 分析任务，缺省为标准经营洞察
    #[serde(default)]
    pub question: Option<String>,
    /// 调用方附带的销售数据摘要，原样进入提示词
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductDescriptionRequest {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DescriptionResponse {
    pub description: String,
}

/// POST /api/ai/insight - 生成经营洞察
pub async fn insight(
    State(state): State<ServerState>,
    Json(req): Json<InsightRequest>,
) -> AppResult<Json<InsightResponse>> {
    let insight = state
        .ai
        .generate_insight(req.question.as_deref(), req.context.as_ref())
        .await;
    Ok(Json(InsightResponse { insight }))
}

/// POST /api/ai/product-description - 生成商品描述
pub async fn product_description(
    State(state): State<ServerState>,
    Json(req): Json<ProductDescriptionRequest>,
) -> AppResult<Json<DescriptionResponse>> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;

    let description = state
        .ai
        .generate_product_description(&req.name, req.category.as_deref())
        .await;
    Ok(Json(DescriptionResponse { description }))
}

/// GET /api/ai/status - AI 服务可用性
pub async fn status(State(state): State<ServerState>) -> Json<AiStatus> {
    Json(state.ai.status())
}
