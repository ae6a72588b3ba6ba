//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::models::Claims;
use crate::common::{ApiError, AppState};

/// Authenticated user extractor
///
/// Validates the bearer JWT against `JWT_SECRET`. The token subject is trusted
/// as the caller's identity; no directory lookup happens here.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
}

/// Caller of the periodic reminder trigger, authorized by `CRON_SECRET`
#[derive(Debug)]
pub struct CronCaller;

async fn app_state<S>(parts: &mut Parts, state: &S) -> Result<Arc<RwLock<AppState>>, ApiError>
where
    S: Send + Sync,
{
    let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
        Extension::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;
    Ok(state_lock)
}

/// Raw value of the Authorization header with any `Bearer ` prefix removed
fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Cron credential, accepted only as exactly `Bearer <secret>`
fn cron_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?
        .strip_prefix("Bearer ")
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state_lock = app_state(parts, state).await?;
        let jwt_secret = state_lock.read().await.jwt_secret.clone();

        let token = match bearer_token(parts) {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };

        let decoded = match decode::<Claims>(
            &token,
            &DecodingKey::from_secret(jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        ) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "JWT token validation failed");
                return Err(ApiError::Unauthorized("invalid token".into()));
            }
        };

        debug!(user_id = %decoded.claims.sub, "User authenticated via extractor");

        Ok(AuthedUser {
            id: decoded.claims.sub,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CronCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state_lock = app_state(parts, state).await?;
        let expected = state_lock.read().await.cron_secret.clone();

        let Some(expected) = expected else {
            return Ok(CronCaller);
        };

        match cron_token(parts) {
            Some(token) if token == expected => Ok(CronCaller),
            Some(_) => {
                warn!("Reminder trigger rejected: wrong secret");
                Err(ApiError::Unauthorized("Unauthorized".into()))
            }
            None => {
                warn!("Reminder trigger rejected: missing Authorization header");
                Err(ApiError::Unauthorized("Unauthorized".into()))
            }
        }
    }
}
