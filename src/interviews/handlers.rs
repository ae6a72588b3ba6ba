// src/interviews/handlers.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::*;
use super::validators::InterviewValidator;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, Validator};

/// GET /api/interviews - All interviews
pub async fn list_interviews(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await;
    let interviews = state.interviews.list_all().await?;
    Ok(Json(interviews))
}

/// GET /api/interviews/mine - Interviews where the caller is the candidate
///
/// Anonymous callers get an empty list rather than a 401.
pub async fn list_my_interviews(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: Option<AuthedUser>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(authed) = authed else {
        return Ok(Json(Vec::<Interview>::new()));
    };

    let state = state_lock.read().await;
    let interviews = state.interviews.list_by_candidate(&authed.id).await?;
    Ok(Json(interviews))
}

/// GET /api/interviews/call/:call_id - Interview bound to a video call, or null
pub async fn get_interview_by_call_id(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(call_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await;
    let interview = state.interviews.find_by_call_id(&call_id).await?;
    Ok(Json(interview))
}

/// POST /api/interviews - Create an interview
pub async fn create_interview(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(body): Json<CreateInterviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    InterviewValidator.validate(&body).into_result()?;

    info!(
        user_id = %authed.id,
        stream_call_id = %body.stream_call_id,
        "Creating interview"
    );

    let state = state_lock.read().await;
    let interview = state.interviews.insert(body).await?;

    Ok((StatusCode::CREATED, Json(interview)))
}

/// PATCH /api/interviews/:id/status - Change an interview's status
pub async fn update_interview_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateInterviewStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    InterviewValidator.validate(&body).into_result()?;

    info!(
        user_id = %authed.id,
        interview_id = %id,
        status = %body.status,
        "Updating interview status"
    );

    let state = state_lock.read().await;
    let now = state.clock.now_millis();
    let interview = state
        .interviews
        .update_status(&id, &body.status, now)
        .await?;

    Ok(Json(interview))
}
