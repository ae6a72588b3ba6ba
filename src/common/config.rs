// src/common/config.rs
//! Process configuration read from environment variables

use chrono_tz::Tz;
use std::env;
use std::time::Duration;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "replace_with_strong_secret";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001,http://localhost:5173";

/// Where interview and user records live
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// Local SQLite tables managed by this service
    Sqlite,
    /// Managed document store reached over its HTTP query endpoint
    Remote {
        base_url: String,
        access_token: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub cron_secret: Option<String>,
    pub store_backend: StoreBackend,
    pub display_timezone: Tz,
    pub reminder_scan_interval: Option<Duration>,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; empty values count as unset
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| "sqlite://interviews.db".to_string());

        let port = get("PORT").and_then(|p| p.parse::<u16>().ok()).unwrap_or(8080);

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, falling back to the development placeholder");
            DEFAULT_JWT_SECRET.to_string()
        });

        let cron_secret = get("CRON_SECRET");

        let store_backend = match get("STORE_BACKEND").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("sqlite") => StoreBackend::Sqlite,
            Some("remote") => {
                let base_url = get("INTERVIEW_STORE_URL").ok_or_else(|| {
                    anyhow::anyhow!("STORE_BACKEND=remote requires INTERVIEW_STORE_URL")
                })?;
                StoreBackend::Remote {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    access_token: get("INTERVIEW_STORE_TOKEN"),
                }
            }
            Some(other) => anyhow::bail!("Unknown STORE_BACKEND '{}', expected sqlite or remote", other),
        };

        let display_timezone = match get("DISPLAY_TIMEZONE") {
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                warn!(timezone = %name, "Unknown DISPLAY_TIMEZONE, using UTC");
                Tz::UTC
            }),
            None => Tz::UTC,
        };

        let reminder_scan_interval = get("REMINDER_SCAN_INTERVAL_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            database_url,
            port,
            jwt_secret,
            cron_secret,
            store_backend,
            display_timezone,
            reminder_scan_interval,
            cors_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let map = vars(&[]);
        let config = AppConfig::from_vars(|k| map.get(k).cloned()).unwrap();

        assert_eq!(config.database_url, "sqlite://interviews.db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
        assert_eq!(config.display_timezone, Tz::UTC);
        assert!(config.cron_secret.is_none());
        assert!(config.reminder_scan_interval.is_none());
        assert_eq!(config.cors_origins.len(), 3);
    }

    #[test]
    fn test_remote_backend_requires_url() {
        let map = vars(&[("STORE_BACKEND", "remote")]);
        assert!(AppConfig::from_vars(|k| map.get(k).cloned()).is_err());

        let map = vars(&[
            ("STORE_BACKEND", "remote"),
            ("INTERVIEW_STORE_URL", "https://store.example.com/"),
            ("INTERVIEW_STORE_TOKEN", "tok"),
        ]);
        let config = AppConfig::from_vars(|k| map.get(k).cloned()).unwrap();
        assert_eq!(
            config.store_backend,
            StoreBackend::Remote {
                base_url: "https://store.example.com".to_string(),
                access_token: Some("tok".to_string()),
            }
        );
    }

    #[test]
    fn test_timezone_and_interval() {
        let map = vars(&[
            ("DISPLAY_TIMEZONE", "America/New_York"),
            ("REMINDER_SCAN_INTERVAL_SECONDS", "300"),
            ("CRON_SECRET", "s3cret"),
        ]);
        let config = AppConfig::from_vars(|k| map.get(k).cloned()).unwrap();
        assert_eq!(config.display_timezone, chrono_tz::America::New_York);
        assert_eq!(config.reminder_scan_interval, Some(Duration::from_secs(300)));
        assert_eq!(config.cron_secret.as_deref(), Some("s3cret"));

        let map = vars(&[("DISPLAY_TIMEZONE", "Mars/Olympus")]);
        let config = AppConfig::from_vars(|k| map.get(k).cloned()).unwrap();
        assert_eq!(config.display_timezone, Tz::UTC);
    }
}
