//! Tests for the interviews module
//!
//! Covers the SQLite store and the request validators.

#[cfg(test)]
mod tests {
    use super::super::models::*;
    use super::super::store::{InterviewStore, SqliteInterviewStore};
    use super::super::validators::InterviewValidator;
    use crate::common::test_support::memory_pool;
    use crate::common::test_support::{bearer, test_app};
    use crate::common::{StoreError, Validator, MINUTE_MS};
    use crate::notifications::transport::RecordingTransport;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const START: i64 = 1_767_627_000_000;

    fn request(call_id: &str, candidate: &str, start_time: i64) -> CreateInterviewRequest {
        CreateInterviewRequest {
            title: "Backend Round".to_string(),
            description: Some("System design".to_string()),
            start_time,
            status: STATUS_UPCOMING.to_string(),
            stream_call_id: call_id.to_string(),
            candidate_id: candidate.to_string(),
            interviewer_ids: vec!["user_al".to_string(), "user_bo".to_string()],
        }
    }

    async fn store() -> SqliteInterviewStore {
        SqliteInterviewStore::new(memory_pool().await)
    }

    #[tokio::test]
    async fn test_insert_round_trips_interviewer_order() {
        let store = store().await;
        let created = store.insert(request("call-1", "cand-1", START)).await.unwrap();

        assert!(created.id.starts_with("I_"));
        assert_eq!(created.interviewer_ids, vec!["user_al", "user_bo"]);
        assert_eq!(created.status, STATUS_UPCOMING);
        assert!(created.end_time.is_none());

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn test_list_by_candidate_filters() {
        let store = store().await;
        store.insert(request("call-1", "cand-1", START)).await.unwrap();
        store.insert(request("call-2", "cand-2", START)).await.unwrap();
        store
            .insert(request("call-3", "cand-1", START + 60 * MINUTE_MS))
            .await
            .unwrap();

        let mine = store.list_by_candidate("cand-1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|i| i.candidate_id == "cand-1"));
        assert!(mine[0].start_time <= mine[1].start_time);
    }

    #[tokio::test]
    async fn test_find_by_call_id() {
        let store = store().await;
        let created = store.insert(request("call-xyz", "cand-1", START)).await.unwrap();

        let found = store.find_by_call_id("call-xyz").await.unwrap();
        assert_eq!(found.map(|i| i.id), Some(created.id));

        assert!(store.find_by_call_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_completing_sets_end_time() {
        let store = store().await;
        let created = store.insert(request("call-1", "cand-1", START)).await.unwrap();

        let live = store
            .update_status(&created.id, "live", START + MINUTE_MS)
            .await
            .unwrap();
        assert_eq!(live.status, "live");
        assert!(live.end_time.is_none());

        let done = store
            .update_status(&created.id, STATUS_COMPLETED, START + 45 * MINUTE_MS)
            .await
            .unwrap();
        assert_eq!(done.status, STATUS_COMPLETED);
        assert_eq!(done.end_time, Some(START + 45 * MINUTE_MS));
    }

    #[tokio::test]
    async fn test_update_unknown_interview_is_not_found() {
        let store = store().await;
        let err = store
            .update_status("I_NOPE00", STATUS_COMPLETED, START)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_starting_between_is_inclusive() {
        let store = store().await;
        let from = START;
        let to = START + 5 * MINUTE_MS;

        store.insert(request("at-from", "c", from)).await.unwrap();
        store.insert(request("at-to", "c", to)).await.unwrap();
        store.insert(request("before", "c", from - 1)).await.unwrap();
        store.insert(request("after", "c", to + 1)).await.unwrap();
        let done = store.insert(request("done", "c", from + 1)).await.unwrap();
        store
            .update_status(&done.id, STATUS_COMPLETED, from)
            .await
            .unwrap();

        let found = store
            .list_starting_between(STATUS_UPCOMING, from, to)
            .await
            .unwrap();
        let mut calls: Vec<_> = found.iter().map(|i| i.stream_call_id.as_str()).collect();
        calls.sort();
        assert_eq!(calls, vec!["at-from", "at-to"]);
    }

    #[test]
    fn test_create_validator_accepts_valid_request() {
        let result = InterviewValidator.validate(&request("call-1", "cand-1", START));
        assert!(result.is_valid);
    }

    #[test]
    fn test_create_validator_collects_errors() {
        let mut bad = request(" ", "", 0);
        bad.title = String::new();
        bad.status = "Not Valid".to_string();
        bad.interviewer_ids = vec!["".to_string()];

        let result = InterviewValidator.validate(&bad);
        assert!(!result.is_valid);

        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        for field in [
            "title",
            "startTime",
            "status",
            "streamCallId",
            "candidateId",
            "interviewerIds",
        ] {
            assert!(fields.contains(&field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_status_validator() {
        let ok = UpdateInterviewStatusRequest {
            status: "completed".to_string(),
        };
        assert!(InterviewValidator.validate(&ok).is_valid);

        let bad = UpdateInterviewStatusRequest {
            status: "".to_string(),
        };
        assert!(!InterviewValidator.validate(&bad).is_valid);
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_lookup_routes() {
        let app = test_app(RecordingTransport::default(), START).await;

        let created = app
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/interviews")
                    .header("authorization", bearer("user_org"))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "title": "Backend Round",
                            "startTime": START,
                            "status": "upcoming",
                            "streamCallId": "call-42",
                            "candidateId": "user_cy",
                            "interviewerIds": ["user_al"]
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        assert_eq!(created["streamCallId"], "call-42");
        assert_eq!(created["interviewerIds"], json!(["user_al"]));

        let by_call = app
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/interviews/call/call-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(by_call).await["id"], created["id"]);

        let unknown_call = app
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/interviews/call/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(unknown_call).await, Value::Null);
    }

    #[tokio::test]
    async fn test_mine_route() {
        let app = test_app(RecordingTransport::default(), START).await;
        app.interviews
            .insert(request("call-1", "user_cy", START))
            .await
            .unwrap();

        let anonymous = app
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/interviews/mine")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::OK);
        assert_eq!(body_json(anonymous).await, json!([]));

        let mine = app
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/interviews/mine")
                    .header("authorization", bearer("user_cy"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(mine).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_status_route_stamps_end_time_from_clock() {
        let app = test_app(RecordingTransport::default(), START + 50 * MINUTE_MS).await;
        let created = app
            .interviews
            .insert(request("call-1", "user_cy", START))
            .await
            .unwrap();

        let response = app
            .router()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/interviews/{}/status", created.id))
                    .header("authorization", bearer("user_org"))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "status": "completed" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "completed");
        assert_eq!(body["endTime"], START + 50 * MINUTE_MS);

        let missing = app
            .router()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/interviews/I_NOPE00/status")
                    .header("authorization", bearer("user_org"))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "status": "completed" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
