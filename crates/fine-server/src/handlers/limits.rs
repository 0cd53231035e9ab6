//! Category limit handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::read_json;
use crate::{get_owner, AppError, AppState, MessageResponse};
use fine_core::limits::LimitCheck;
use fine_core::models::{Category, CategoryLimit};

/// The full limit set, as sent and returned
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LimitsBody {
    pub limits: Vec<CategoryLimit>,
}

/// Response after replacing the limit set
#[derive(Debug, Serialize)]
pub struct LimitsUpdated {
    pub message: String,
    pub limits: Vec<CategoryLimit>,
}

/// Request body for setting one category's limit
#[derive(Debug, Deserialize)]
pub struct SetLimitRequest {
    pub limit: Decimal,
}

fn parse_category(raw: &str) -> Result<Category, AppError> {
    raw.parse()
        .map_err(|e: String| AppError::bad_request(&e))
}

/// GET /api/category-limits - List configured limits
pub async fn list_limits(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<LimitsBody>, AppError> {
    let owner = get_owner(request.headers());
    let limits = state.db().list_limits(&owner)?;
    Ok(Json(LimitsBody { limits }))
}

/// POST /api/category-limits - Replace the whole limit set
pub async fn replace_limits(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<LimitsUpdated>, AppError> {
    let owner = get_owner(request.headers());
    let body: LimitsBody = read_json(request).await?;

    let limits = state.db().replace_limits(&owner, &body.limits)?;
    Ok(Json(LimitsUpdated {
        message: "Category limits updated successfully".to_string(),
        limits,
    }))
}

/// PUT /api/category-limits/:category - Set one category's limit
pub async fn upsert_limit(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    request: Request,
) -> Result<Json<CategoryLimit>, AppError> {
    let owner = get_owner(request.headers());
    let category = parse_category(&category)?;
    let req: SetLimitRequest = read_json(request).await?;

    let limit = CategoryLimit {
        category,
        limit: req.limit,
    };
    state.db().upsert_limit(&owner, &limit)?;
    Ok(Json(limit))
}

/// DELETE /api/category-limits/:category - Remove one category's limit
pub async fn remove_limit(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    request: Request,
) -> Result<Json<MessageResponse>, AppError> {
    let owner = get_owner(request.headers());
    let category = parse_category(&category)?;

    if !state.db().remove_limit(&owner, category)? {
        return Err(AppError::not_found("No limit set for this category"));
    }
    Ok(MessageResponse::new("Category limit removed"))
}

/// GET /api/category-limits/check - This month's spending against limits
pub async fn check_limits(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<LimitCheck>, AppError> {
    let owner = get_owner(request.headers());
    let check = state.service.check_limits(&owner, Utc::now())?;
    Ok(Json(check))
}
