// src/users/routes.rs

use crate::users::handlers;
use axum::{routing::get, Router};

/// # Routes
/// - `GET /api/users` - Directory listing (auth)
/// - `GET /api/users/me` - Caller's entry (auth)
/// - `PUT /api/users/me` - Upsert caller's name and email (auth)
pub fn users_routes() -> Router {
    Router::new()
        .route("/api/users", get(handlers::list_users))
        .route(
            "/api/users/me",
            get(handlers::get_me).put(handlers::upsert_me),
        )
}
