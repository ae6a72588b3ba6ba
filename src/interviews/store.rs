// src/interviews/store.rs
//! Interview persistence behind a trait so the local SQLite tables and the
//! remote document store are interchangeable.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{CreateInterviewRequest, Interview, InterviewRow, STATUS_COMPLETED};
use crate::common::{generate_interview_id, StoreError};

#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Interview>, StoreError>;

    async fn list_by_candidate(&self, candidate_id: &str) -> Result<Vec<Interview>, StoreError>;

    async fn find_by_call_id(&self, stream_call_id: &str) -> Result<Option<Interview>, StoreError>;

    async fn insert(&self, request: CreateInterviewRequest) -> Result<Interview, StoreError>;

    /// Patches the status; moving to `completed` stamps `end_time` with `now_ms`
    async fn update_status(
        &self,
        id: &str,
        status: &str,
        now_ms: i64,
    ) -> Result<Interview, StoreError>;

    /// Interviews with `status` whose start time lies in `[from_ms, to_ms]`, both inclusive.
    /// Privileged read used by the reminder scan; no caller identity is involved.
    async fn list_starting_between(
        &self,
        status: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<Interview>, StoreError>;
}

const SELECT_COLUMNS: &str = "SELECT id, title, description, start_time, end_time, status, \
     stream_call_id, candidate_id, interviewer_ids, created_at FROM interviews";

fn into_interviews(rows: Vec<InterviewRow>) -> Result<Vec<Interview>, StoreError> {
    rows.into_iter().map(Interview::try_from).collect()
}

#[derive(Debug, Clone)]
pub struct SqliteInterviewStore {
    pool: SqlitePool,
}

impl SqliteInterviewStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get(&self, id: &str) -> Result<Interview, StoreError> {
        let row = sqlx::query_as::<_, InterviewRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("interview {}", id)))?;
        Interview::try_from(row)
    }
}

#[async_trait]
impl InterviewStore for SqliteInterviewStore {
    async fn list_all(&self) -> Result<Vec<Interview>, StoreError> {
        let rows = sqlx::query_as::<_, InterviewRow>(&format!("{} ORDER BY start_time", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        into_interviews(rows)
    }

    async fn list_by_candidate(&self, candidate_id: &str) -> Result<Vec<Interview>, StoreError> {
        let rows = sqlx::query_as::<_, InterviewRow>(&format!(
            "{} WHERE candidate_id = ? ORDER BY start_time",
            SELECT_COLUMNS
        ))
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        into_interviews(rows)
    }

    async fn find_by_call_id(&self, stream_call_id: &str) -> Result<Option<Interview>, StoreError> {
        let row = sqlx::query_as::<_, InterviewRow>(&format!(
            "{} WHERE stream_call_id = ? LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(stream_call_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Interview::try_from).transpose()
    }

    async fn insert(&self, request: CreateInterviewRequest) -> Result<Interview, StoreError> {
        let id = generate_interview_id();
        let interviewer_ids = serde_json::to_string(&request.interviewer_ids)
            .map_err(|e| StoreError::Corrupt(format!("interviewer_ids: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO interviews (
                id, title, description, start_time, status, stream_call_id, candidate_id, interviewer_ids
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.start_time)
        .bind(&request.status)
        .bind(&request.stream_call_id)
        .bind(&request.candidate_id)
        .bind(&interviewer_ids)
        .execute(&self.pool)
        .await?;

        info!(
            interview_id = %id,
            start_time = request.start_time,
            interviewers = request.interviewer_ids.len(),
            "Interview stored"
        );

        self.get(&id).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: &str,
        now_ms: i64,
    ) -> Result<Interview, StoreError> {
        let result = if status == STATUS_COMPLETED {
            sqlx::query("UPDATE interviews SET status = ?, end_time = ? WHERE id = ?")
                .bind(status)
                .bind(now_ms)
                .bind(id)
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query("UPDATE interviews SET status = ? WHERE id = ?")
                .bind(status)
                .bind(id)
                .execute(&self.pool)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("interview {}", id)));
        }

        debug!(interview_id = %id, status = %status, "Interview status updated");
        self.get(id).await
    }

    async fn list_starting_between(
        &self,
        status: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<Interview>, StoreError> {
        let rows = sqlx::query_as::<_, InterviewRow>(&format!(
            "{} WHERE status = ? AND start_time >= ? AND start_time <= ? ORDER BY start_time",
            SELECT_COLUMNS
        ))
        .bind(status)
        .bind(from_ms)
        .bind(to_ms)
        .fetch_all(&self.pool)
        .await?;
        into_interviews(rows)
    }
}
