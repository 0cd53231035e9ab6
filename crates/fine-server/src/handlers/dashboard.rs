//! Dashboard handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};

use crate::{get_owner, AppError, AppState};
use fine_core::Dashboard;

/// GET /api/dashboard/stats - Balance, totals, category breakdown and recent activity
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Dashboard>, AppError> {
    let owner = get_owner(request.headers());
    Ok(Json(state.service.dashboard(&owner)?))
}
