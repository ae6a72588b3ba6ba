// src/services/remote_store.rs
//! Client for the managed document store that hosts interviews and users
//!
//! Every call is `POST {base}/api/query` or `{base}/api/mutation` with
//! `{path, args, format: "json"}`; the answer is
//! `{status: "success", value}` or `{status: "error", errorMessage}`.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::common::StoreError;
use crate::interviews::models::CreateInterviewRequest;
use crate::interviews::{Interview, InterviewStore};
use crate::users::{User, UserDirectory};

const GET_ALL_INTERVIEWS: &str = "interviews:getAllInterviews";
const GET_BY_STREAM_CALL_ID: &str = "interviews:getInterviewByStreamCallId";
const CREATE_INTERVIEW: &str = "interviews:createInterview";
const UPDATE_INTERVIEW_STATUS: &str = "interviews:updateInterviewStatus";
const GET_UPCOMING_FOR_REMINDER: &str = "interviews:getUpcomingInterviewsForReminder";
const GET_ALL_USERS_FOR_CRON: &str = "users:getAllUsersForCron";

#[derive(Debug, Clone, Copy)]
enum CallKind {
    Query,
    Mutation,
}

impl CallKind {
    fn path(self) -> &'static str {
        match self {
            CallKind::Query => "api/query",
            CallKind::Mutation => "api/mutation",
        }
    }
}

#[derive(Serialize)]
struct FunctionCall<'a> {
    path: &'a str,
    args: Value,
    format: &'static str,
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum FunctionResult {
    Success {
        #[serde(default)]
        value: Value,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

/// Interview document as stored remotely
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteInterview {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_creationTime")]
    creation_time: Option<f64>,
    title: String,
    description: Option<String>,
    start_time: f64,
    end_time: Option<f64>,
    status: String,
    stream_call_id: String,
    candidate_id: String,
    #[serde(default)]
    interviewer_ids: Vec<String>,
}

/// User document; `clerkId` is the identity provider's subject
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteUser {
    #[serde(rename = "_creationTime")]
    creation_time: Option<f64>,
    clerk_id: String,
    name: String,
    email: String,
}

/// Document numbers are float64; fractional millis round down
fn epoch_millis(value: f64) -> i64 {
    value.floor() as i64
}

fn creation_timestamp(millis: Option<f64>) -> Option<String> {
    millis
        .and_then(|ms| Utc.timestamp_millis_opt(ms as i64).single())
        .map(|t| t.to_rfc3339())
}

impl From<RemoteInterview> for Interview {
    fn from(doc: RemoteInterview) -> Self {
        Interview {
            id: doc.id,
            title: doc.title,
            description: doc.description,
            start_time: epoch_millis(doc.start_time),
            end_time: doc.end_time.map(epoch_millis),
            status: doc.status,
            stream_call_id: doc.stream_call_id,
            candidate_id: doc.candidate_id,
            interviewer_ids: doc.interviewer_ids,
            created_at: creation_timestamp(doc.creation_time),
        }
    }
}

impl From<RemoteUser> for User {
    fn from(doc: RemoteUser) -> Self {
        let created_at = creation_timestamp(doc.creation_time);
        User {
            id: doc.clerk_id,
            name: doc.name,
            email: doc.email,
            updated_at: created_at.clone(),
            created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteStoreClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl RemoteStoreClient {
    pub fn new(http: reqwest::Client, base_url: &str, access_token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        kind: CallKind,
        path: &str,
        args: Value,
    ) -> Result<T, StoreError> {
        let url = format!("{}/{}", self.base_url, kind.path());
        let mut request = self.http.post(&url).json(&FunctionCall {
            path,
            args,
            format: "json",
        });
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!(function = %path, error = %e, "Remote store request failed");
            StoreError::Remote(format!("{}: {}", path, e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Remote(format!("{}: {}", path, e)))?;

        let result: FunctionResult = serde_json::from_str(&body).map_err(|e| {
            error!(function = %path, status = %status, "Unexpected remote store response");
            StoreError::Remote(format!("{}: HTTP {} with unreadable body ({})", path, status, e))
        })?;

        match result {
            FunctionResult::Success { value } => {
                debug!(function = %path, "Remote store call succeeded");
                serde_json::from_value(value)
                    .map_err(|e| StoreError::Corrupt(format!("{}: {}", path, e)))
            }
            FunctionResult::Error { error_message } => {
                error!(function = %path, error = %error_message, "Remote store function failed");
                Err(StoreError::Remote(format!("{}: {}", path, error_message)))
            }
        }
    }

    async fn all_interviews(&self) -> Result<Vec<Interview>, StoreError> {
        let docs: Vec<RemoteInterview> =
            self.call(CallKind::Query, GET_ALL_INTERVIEWS, json!({})).await?;
        Ok(docs.into_iter().map(Interview::from).collect())
    }
}

#[async_trait]
impl InterviewStore for RemoteStoreClient {
    async fn list_all(&self) -> Result<Vec<Interview>, StoreError> {
        self.all_interviews().await
    }

    /// Filtered locally; the remote per-candidate query is bound to the end user's session
    async fn list_by_candidate(&self, candidate_id: &str) -> Result<Vec<Interview>, StoreError> {
        let mut interviews = self.all_interviews().await?;
        interviews.retain(|i| i.candidate_id == candidate_id);
        Ok(interviews)
    }

    async fn find_by_call_id(&self, stream_call_id: &str) -> Result<Option<Interview>, StoreError> {
        let doc: Option<RemoteInterview> = self
            .call(
                CallKind::Query,
                GET_BY_STREAM_CALL_ID,
                json!({ "streamCallId": stream_call_id }),
            )
            .await?;
        Ok(doc.map(Interview::from))
    }

    async fn insert(&self, request: CreateInterviewRequest) -> Result<Interview, StoreError> {
        let args = serde_json::to_value(&request)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", CREATE_INTERVIEW, e)))?;
        let id: String = self.call(CallKind::Mutation, CREATE_INTERVIEW, args).await?;

        Ok(Interview {
            id,
            title: request.title,
            description: request.description,
            start_time: request.start_time,
            end_time: None,
            status: request.status,
            stream_call_id: request.stream_call_id,
            candidate_id: request.candidate_id,
            interviewer_ids: request.interviewer_ids,
            created_at: None,
        })
    }

    /// The remote function stamps its own `endTime`; `now_ms` is unused here
    async fn update_status(
        &self,
        id: &str,
        status: &str,
        _now_ms: i64,
    ) -> Result<Interview, StoreError> {
        let _: Value = self
            .call(
                CallKind::Mutation,
                UPDATE_INTERVIEW_STATUS,
                json!({ "id": id, "status": status }),
            )
            .await?;

        self.all_interviews()
            .await?
            .into_iter()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("interview {}", id)))
    }

    /// The remote query computes its own window from its clock; bounds are re-applied here
    async fn list_starting_between(
        &self,
        status: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<Interview>, StoreError> {
        let docs: Vec<RemoteInterview> = self
            .call(CallKind::Query, GET_UPCOMING_FOR_REMINDER, json!({}))
            .await?;
        Ok(docs
            .into_iter()
            .map(Interview::from)
            .filter(|i| i.status == status && i.start_time >= from_ms && i.start_time <= to_ms)
            .collect())
    }
}

#[async_trait]
impl UserDirectory for RemoteStoreClient {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let docs: Vec<RemoteUser> = self
            .call(CallKind::Query, GET_ALL_USERS_FOR_CRON, json!({}))
            .await?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.list_users().await?.into_iter().find(|u| u.id == id))
    }

    async fn upsert_user(&self, _id: &str, _name: &str, _email: &str) -> Result<User, StoreError> {
        Err(StoreError::Unsupported(
            "users are synced by the identity provider webhook",
        ))
    }
}
