//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::read_json;
use crate::{get_owner, AppError, AppState, MessageResponse};
use fine_core::goals::{goal_view, GoalWithView};
use fine_core::models::{Goal, NewGoal};

/// Request body for updating goal progress
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    pub current_amount: Decimal,
}

fn with_view(goal: Goal) -> GoalWithView {
    let view = goal_view(&goal, Utc::now());
    GoalWithView { goal, view }
}

/// GET /api/goals - List goals with progress and deadline figures
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<GoalWithView>>, AppError> {
    let owner = get_owner(request.headers());
    let goals = state.service.goal_views(&owner, Utc::now())?;
    Ok(Json(goals))
}

/// POST /api/goals - Create a goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<GoalWithView>), AppError> {
    let owner = get_owner(request.headers());
    let new_goal: NewGoal = read_json(request).await?;

    let goal = state.db().create_goal(&owner, &new_goal)?;
    Ok((StatusCode::CREATED, Json(with_view(goal))))
}

/// PATCH /api/goals/:id - Set a goal's current amount
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<GoalWithView>, AppError> {
    let owner = get_owner(request.headers());
    let req: UpdateGoalRequest = read_json(request).await?;

    state
        .db()
        .update_goal_amount(&owner, id, req.current_amount)?
        .map(|goal| Json(with_view(goal)))
        .ok_or_else(|| AppError::not_found("Goal not found"))
}

/// DELETE /api/goals/:id - Delete a goal
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<MessageResponse>, AppError> {
    let owner = get_owner(request.headers());
    if !state.db().delete_goal(&owner, id)? {
        return Err(AppError::not_found("Goal not found"));
    }
    Ok(MessageResponse::new("Goal deleted"))
}
