// src/users/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Directory entry keyed by the identity provider's subject id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub name: String,
    pub email: String,
}
