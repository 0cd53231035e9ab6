//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::read_json;
use crate::{get_owner, AppError, AppState, MessageResponse};
use fine_core::models::{NewTransaction, Transaction};

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let owner = get_owner(request.headers());
    let transactions = state.db().list_transactions(&owner)?;
    Ok(Json(transactions))
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let owner = get_owner(request.headers());
    let new_tx: NewTransaction = read_json(request).await?;

    let tx = state.db().insert_transaction(&owner, &new_tx)?;
    info!(
        owner = %owner,
        id = tx.id,
        kind = %tx.kind,
        category = %tx.category,
        "Transaction recorded"
    );

    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let owner = get_owner(request.headers());
    state
        .db()
        .get_transaction(&owner, id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Transaction not found"))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<MessageResponse>, AppError> {
    let owner = get_owner(request.headers());
    if !state.db().delete_transaction(&owner, id)? {
        return Err(AppError::not_found("Transaction not found"));
    }
    Ok(MessageResponse::new("Transaction deleted"))
}
