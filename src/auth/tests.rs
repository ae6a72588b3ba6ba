//! Tests for auth module
//!
//! These tests verify:
//! - JWT encoding and validation
//! - The `AuthedUser` extractor on protected routes
//! - The `CronCaller` shared-secret check

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::test_support::*;
    use crate::notifications::transport::RecordingTransport;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
    use tower::ServiceExt;

    fn get(uri: &str, authorization: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_jwt_encoding_and_decoding() {
        let secret = "test_secret_key";
        let claims = Claims {
            sub: "user_123".to_string(),
            exp: 9999999999,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("Failed to encode token");

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .expect("Failed to decode token");

        assert_eq!(decoded.claims.sub, "user_123");
        assert_eq!(decoded.claims.exp, 9999999999);
    }

    #[test]
    fn test_jwt_validation_fails_with_wrong_secret() {
        let claims = Claims {
            sub: "user_123".to_string(),
            exp: 9999999999,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key"),
        )
        .expect("Failed to encode token");

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"wrong_secret_key"),
            &Validation::new(Algorithm::HS256),
        );

        assert!(
            result.is_err(),
            "Token validation should fail with wrong secret"
        );
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = test_app(RecordingTransport::default(), 0).await;

        let response = app
            .router()
            .oneshot(get("/api/interviews", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .router()
            .oneshot(get("/api/interviews", Some("Bearer not.a.jwt".to_string())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .router()
            .oneshot(get("/api/interviews", Some(bearer("user_123"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let app = test_app(RecordingTransport::default(), 0).await;
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                sub: "user_123".to_string(),
                exp: 9999999999,
            },
            &EncodingKey::from_secret(b"someone_elses_secret"),
        )
        .unwrap();

        let response = app
            .router()
            .oneshot(get("/api/users", Some(format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cron_trigger_open_without_secret() {
        let app = test_app(RecordingTransport::default(), 0).await;
        app.shared.write().await.cron_secret = None;

        let response = app
            .router()
            .oneshot(get("/api/cron/reminder-emails", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cron_trigger_accepts_secret() {
        let app = test_app(RecordingTransport::default(), 0).await;

        let response = app
            .router()
            .oneshot(get(
                "/api/cron/reminder-emails",
                Some(format!("Bearer {}", TEST_CRON_SECRET)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // A user JWT is not the cron secret
        let response = app
            .router()
            .oneshot(get("/api/cron/reminder-emails", Some(bearer("user_123"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cron_trigger_requires_bearer_scheme() {
        let app = test_app(RecordingTransport::default(), 0).await;

        for header in [
            TEST_CRON_SECRET.to_string(),
            format!("bearer {}", TEST_CRON_SECRET),
            format!("Bearer  {}", TEST_CRON_SECRET),
            format!("Bearer {} ", TEST_CRON_SECRET),
        ] {
            let response = app
                .router()
                .oneshot(get("/api/cron/reminder-emails", Some(header.clone())))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "accepted {:?}",
                header
            );
        }
    }
}
