// src/users/handlers.rs

use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::UpsertUserRequest;
use crate::auth::AuthedUser;
use crate::common::{looks_like_email, safe_email_log, ApiError, AppState, ValidationResult};

/// GET /api/users - Directory listing
pub async fn list_users(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await;
    let users = state.users.list_users().await?;
    Ok(Json(users))
}

/// GET /api/users/me - Caller's directory entry
pub async fn get_me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await;
    let user = state
        .users
        .find_user(&authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User is not in the directory".to_string()))?;
    Ok(Json(user))
}

/// PUT /api/users/me - Create or refresh the caller's directory entry
pub async fn upsert_me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(body): Json<UpsertUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut validation = ValidationResult::new();
    if body.name.trim().is_empty() {
        validation.add_error("name", "Name is required");
    }
    if !looks_like_email(&body.email) {
        validation.add_error("email", "Valid email is required");
    }
    validation.into_result()?;

    info!(
        user_id = %authed.id,
        email = %safe_email_log(&body.email),
        "Syncing directory entry"
    );

    let state = state_lock.read().await;
    let user = state
        .users
        .upsert_user(&authed.id, body.name.trim(), body.email.trim())
        .await?;
    Ok(Json(user))
}
