// src/notifications/routes.rs

use crate::notifications::handlers;
use axum::{routing::get, routing::post, Router};

/// # Routes
/// - `POST /api/send-interview-emails` - Scheduling emails for a new interview (auth)
/// - `GET|POST /api/cron/reminder-emails` - Reminder scan (cron secret)
pub fn notifications_routes() -> Router {
    Router::new()
        .route(
            "/api/send-interview-emails",
            post(handlers::send_interview_emails),
        )
        .route(
            "/api/cron/reminder-emails",
            get(handlers::run_reminder_emails).post(handlers::run_reminder_emails),
        )
}
