// src/notifications/handlers.rs

use axum::{extract::Extension, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::scheduled::{ScheduleNotificationRequest, ScheduleNotificationValidator};
use crate::auth::{AuthedUser, CronCaller};
use crate::common::{safe_email_log, ApiError, AppState, Validator};

/// POST /api/send-interview-emails - Notify participants of a newly created interview
pub async fn send_interview_emails(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(body): Json<ScheduleNotificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ScheduleNotificationValidator.validate(&body).into_result()?;

    info!(
        user_id = %authed.id,
        candidate = %safe_email_log(&body.candidate.email),
        interviewers = body.interviewers.len(),
        "Sending scheduling emails"
    );

    // Released before any network I/O
    let notifications = state_lock.read().await.notifications.clone();
    notifications.send_scheduled(&body).await?;

    Ok(Json(json!({ "ok": true })))
}

/// GET|POST /api/cron/reminder-emails - Periodic reminder scan
pub async fn run_reminder_emails(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _caller: CronCaller,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = state_lock.read().await.notifications.clone();
    let summary = notifications.run_reminder_scan().await?;
    Ok(Json(summary))
}
