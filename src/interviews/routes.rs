// src/interviews/routes.rs

use crate::interviews::handlers;
use axum::{
    routing::{get, patch},
    Router,
};

/// # Routes
/// - `GET /api/interviews` - All interviews (auth)
/// - `POST /api/interviews` - Create an interview (auth)
/// - `GET /api/interviews/mine` - Caller's interviews as candidate
/// - `GET /api/interviews/call/:call_id` - Interview by video call id
/// - `PATCH /api/interviews/:id/status` - Update status (auth)
pub fn interviews_routes() -> Router {
    Router::new()
        .route(
            "/api/interviews",
            get(handlers::list_interviews).post(handlers::create_interview),
        )
        .route("/api/interviews/mine", get(handlers::list_my_interviews))
        .route(
            "/api/interviews/call/:call_id",
            get(handlers::get_interview_by_call_id),
        )
        .route(
            "/api/interviews/:id/status",
            patch(handlers::update_interview_status),
        )
}
