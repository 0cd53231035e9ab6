//! Onboarding profile handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Serialize;

use super::read_json;
use crate::{get_owner, AppError, AppState, MessageResponse};
use fine_core::models::{Profile, ProfileResponse};

/// Response after saving a profile
#[derive(Debug, Serialize)]
pub struct ProfileSaved {
    pub message: String,
    pub profile: Profile,
}

/// GET /api/profile - The owner's profile, if any
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ProfileResponse>, AppError> {
    let owner = get_owner(request.headers());
    let profile = state.db().get_profile(&owner)?;
    Ok(Json(profile.into()))
}

/// POST /api/profile - Create or replace the profile
pub async fn save_profile(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ProfileSaved>, AppError> {
    let owner = get_owner(request.headers());
    let profile: Profile = read_json(request).await?;

    let profile = state.db().upsert_profile(&owner, &profile)?;
    Ok(Json(ProfileSaved {
        message: "Profile saved successfully".to_string(),
        profile,
    }))
}

/// DELETE /api/profile - Forget the profile
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<MessageResponse>, AppError> {
    let owner = get_owner(request.headers());
    if !state.db().delete_profile(&owner)? {
        return Err(AppError::not_found("Profile not found"));
    }
    Ok(MessageResponse::new("Profile deleted"))
}
