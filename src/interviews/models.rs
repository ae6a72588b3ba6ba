// src/interviews/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::StoreError;

// ============================================================================
// Interview Status
// ============================================================================

/// Status of an interview that has not started yet; the only one eligible for reminders
pub const STATUS_UPCOMING: &str = "upcoming";
/// Moving to this status stamps `end_time`
pub const STATUS_COMPLETED: &str = "completed";

// ============================================================================
// Interview Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Epoch millis
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub status: String,
    pub stream_call_id: String,
    pub candidate_id: String,
    pub interviewer_ids: Vec<String>,
    pub created_at: Option<String>,
}

/// Row shape of the `interviews` table; interviewer ids are a JSON array
#[derive(Debug, FromRow)]
pub struct InterviewRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub status: String,
    pub stream_call_id: String,
    pub candidate_id: String,
    pub interviewer_ids: String,
    pub created_at: Option<String>,
}

impl TryFrom<InterviewRow> for Interview {
    type Error = StoreError;

    fn try_from(row: InterviewRow) -> Result<Self, Self::Error> {
        let interviewer_ids: Vec<String> = serde_json::from_str(&row.interviewer_ids)
            .map_err(|e| StoreError::Corrupt(format!("interview {} interviewer_ids: {}", row.id, e)))?;

        Ok(Interview {
            id: row.id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status,
            stream_call_id: row.stream_call_id,
            candidate_id: row.candidate_id,
            interviewer_ids,
            created_at: row.created_at,
        })
    }
}

/// Fields supplied when an interview is created
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: i64,
    pub status: String,
    pub stream_call_id: String,
    pub candidate_id: String,
    #[serde(default)]
    pub interviewer_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInterviewStatusRequest {
    pub status: String,
}
