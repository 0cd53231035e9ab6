//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Deserialize;

use super::read_json_or_default;
use crate::{get_owner, AppError, AppState};
use fine_core::{InsightReport, MoodAnalysis};

/// Request body for insight generation
#[derive(Debug, Default, Deserialize)]
pub struct InsightRequest {
    /// Free-text note from the user, appended to the context
    #[serde(default)]
    pub context: Option<String>,
}

/// GET /api/insights/mood-analysis - Expense totals per mood
pub async fn mood_analysis(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<MoodAnalysis>, AppError> {
    let owner = get_owner(request.headers());
    Ok(Json(state.service.mood_analysis(&owner)?))
}

/// POST /api/insights/analyze - Ask the assistant about spending patterns
///
/// Answers 200 with `degraded: true` when the assistant is unavailable.
pub async fn analyze_insights(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<InsightReport>, AppError> {
    let owner = get_owner(request.headers());
    let req: InsightRequest = read_json_or_default(request).await?;

    let report = state
        .service
        .generate_insight(&owner, req.context.as_deref())
        .await?;
    Ok(Json(report))
}
