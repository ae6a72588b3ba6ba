// Fixtures shared by the module test suites

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::clock::FixedClock;
use super::AppState;
use crate::auth::Claims;
use crate::interviews::SqliteInterviewStore;
use crate::notifications::transport::RecordingTransport;
use crate::notifications::{
    EvictionPolicy, InMemoryReminderCache, Mailer, MailerUnavailable, NotificationComposer,
    NotificationService, ReminderEngine,
};
use crate::users::SqliteUserDirectory;

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_CRON_SECRET: &str = "cron_test_secret";
pub const TEST_FROM: &str = "Interviews <noreply@example.com>";

/// Fresh in-memory database with the full schema
///
/// Pinned to one connection: every `sqlite::memory:` connection is its own database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    super::migrations::create_schema(&pool)
        .await
        .expect("schema");
    pool
}

/// `Authorization` header value for a token with subject `sub`
pub fn bearer(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: 9_999_999_999,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("encode token");
    format!("Bearer {}", token)
}

pub struct TestApp {
    pub shared: Arc<RwLock<AppState>>,
    pub interviews: Arc<SqliteInterviewStore>,
    pub users: Arc<SqliteUserDirectory>,
    pub clock: Arc<FixedClock>,
    pub transport: Arc<RecordingTransport>,
}

impl TestApp {
    pub fn router(&self) -> axum::Router {
        crate::app_router(self.shared.clone())
    }
}

/// Full state over an in-memory database and a recording transport
pub async fn test_app(transport: RecordingTransport, now_ms: i64) -> TestApp {
    let transport = Arc::new(transport);
    let mailer = Mailer::new(transport.clone(), TEST_FROM);
    build_app(Ok(mailer), transport, now_ms).await
}

/// Like `test_app` but with no usable email configuration
pub async fn test_app_without_mailer(missing: MailerUnavailable, now_ms: i64) -> TestApp {
    build_app(Err(missing), Arc::new(RecordingTransport::default()), now_ms).await
}

async fn build_app(
    mailer: Result<Mailer, MailerUnavailable>,
    transport: Arc<RecordingTransport>,
    now_ms: i64,
) -> TestApp {
    let pool = memory_pool().await;
    let interviews = Arc::new(SqliteInterviewStore::new(pool.clone()));
    let users = Arc::new(SqliteUserDirectory::new(pool));
    let clock = Arc::new(FixedClock::at(now_ms));
    let composer = NotificationComposer::new(chrono_tz::Tz::UTC);

    let engine = ReminderEngine::new(
        interviews.clone(),
        users.clone(),
        Arc::new(InMemoryReminderCache::new(EvictionPolicy::default())),
        composer,
        clock.clone(),
    );

    let state = AppState {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        cron_secret: Some(TEST_CRON_SECRET.to_string()),
        clock: clock.clone(),
        interviews: interviews.clone(),
        users: users.clone(),
        notifications: NotificationService::new(mailer, composer, engine),
    };

    TestApp {
        shared: Arc::new(RwLock::new(state)),
        interviews,
        users,
        clock,
        transport,
    }
}
