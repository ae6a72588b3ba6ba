// src/notifications/transport/mod.rs
//! Email delivery behind one capability trait
//!
//! Two interchangeable backends: the Resend HTTP API and an authenticated
//! SMTP relay. Both verify credentials before the first send of an invocation.

pub mod resend;
pub mod smtp;

use async_trait::async_trait;
use std::env;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use super::composer::NotificationMessage;
use crate::common::{generate_delivery_id, safe_email_list_log};

pub use resend::ResendTransport;
pub use smtp::SmtpTransport;

pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Payload of one transport call
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Resend error: {status} {body}")]
    Api { status: u16, body: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Message could not be built: {0}")]
    Message(String),

    #[error("Credential verification failed: {0}")]
    Verification(String),
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Short provider name for logs
    fn provider(&self) -> &'static str;

    /// Pre-flight credential check
    async fn verify(&self) -> Result<(), TransportError>;

    /// One send call; every address in `to` receives the same message
    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError>;
}

/// Sender address plus transport; stamps every call with a delivery id for log correlation
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn EmailTransport>,
    from: String,
}

impl Mailer {
    pub fn new(transport: Arc<dyn EmailTransport>, from: impl Into<String>) -> Self {
        Self {
            transport,
            from: from.into(),
        }
    }

    pub fn provider(&self) -> &'static str {
        self.transport.provider()
    }

    pub async fn verify(&self) -> Result<(), TransportError> {
        match self.transport.verify().await {
            Ok(()) => {
                info!(provider = self.provider(), "Email transport verified");
                Ok(())
            }
            Err(e) => {
                error!(provider = self.provider(), error = %e, "Email transport verification failed");
                Err(e)
            }
        }
    }

    /// Sends one composed message; returns its delivery id
    pub async fn deliver(&self, message: &NotificationMessage) -> Result<String, TransportError> {
        let delivery_id = generate_delivery_id();
        let email = OutgoingEmail {
            from: self.from.clone(),
            to: message.to.clone(),
            subject: message.subject.clone(),
            html: message.html.clone(),
        };

        match self.transport.send(&email).await {
            Ok(()) => {
                info!(
                    delivery_id = %delivery_id,
                    provider = self.provider(),
                    recipients = email.to.len(),
                    to = %safe_email_list_log(&email.to),
                    "Email delivered"
                );
                Ok(delivery_id)
            }
            Err(e) => {
                error!(
                    delivery_id = %delivery_id,
                    provider = self.provider(),
                    recipients = email.to.len(),
                    to = %safe_email_list_log(&email.to),
                    error = %e,
                    "Email delivery failed"
                );
                Err(e)
            }
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResendSettings {
    pub api_key: String,
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSettings {
    Smtp(SmtpSettings),
    Resend(ResendSettings),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub from: String,
    pub provider: ProviderSettings,
}

/// Required email settings that are absent
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Missing configuration: {}", .missing.join(", "))]
pub struct ConfigError {
    pub missing: Vec<String>,
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Provider comes from `EMAIL_PROVIDER`, else Resend when an API key is present, else SMTP
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut missing = Vec::new();
        let mut require = |key: &str| {
            let value = get(key);
            if value.is_none() {
                missing.push(key.to_string());
            }
            value.unwrap_or_default()
        };

        let provider_name = get("EMAIL_PROVIDER")
            .map(|p| p.to_lowercase())
            .unwrap_or_else(|| {
                if get("RESEND_API_KEY").is_some() {
                    "resend".to_string()
                } else {
                    "smtp".to_string()
                }
            });

        let provider = match provider_name.as_str() {
            "resend" => ProviderSettings::Resend(ResendSettings {
                api_key: require("RESEND_API_KEY"),
                api_url: get("RESEND_API_URL")
                    .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
            }),
            "smtp" => ProviderSettings::Smtp(SmtpSettings {
                host: require("SMTP_HOST"),
                port: get("SMTP_PORT")
                    .and_then(|p| p.parse::<u16>().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                username: require("SMTP_USER"),
                password: require("SMTP_PASS"),
            }),
            other => {
                warn!(provider = %other, "Unknown EMAIL_PROVIDER, expected smtp or resend");
                return Err(ConfigError {
                    missing: vec!["EMAIL_PROVIDER".to_string()],
                });
            }
        };

        let from = require("MAIL_FROM");

        if !missing.is_empty() {
            return Err(ConfigError { missing });
        }

        Ok(Self { from, provider })
    }
}

/// Builds the configured transport wrapped in a `Mailer`
pub fn build_mailer(config: &EmailConfig, http: reqwest::Client) -> Result<Mailer, TransportError> {
    let transport: Arc<dyn EmailTransport> = match &config.provider {
        ProviderSettings::Resend(settings) => Arc::new(ResendTransport::new(http, settings)),
        ProviderSettings::Smtp(settings) => Arc::new(SmtpTransport::new(settings)?),
    };
    Ok(Mailer::new(transport, config.from.clone()))
}

#[cfg(test)]
pub use recording::RecordingTransport;

#[cfg(test)]
mod recording {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Captures sends; can be told to fail verification or specific sends
    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: Mutex<Vec<OutgoingEmail>>,
        pub verifications: AtomicUsize,
        pub fail_verify: bool,
        /// Any send whose recipients include one of these addresses fails
        pub fail_for: Vec<String>,
    }

    impl RecordingTransport {
        pub fn failing_for(addresses: &[&str]) -> Self {
            Self {
                fail_for: addresses.iter().map(|a| a.to_string()).collect(),
                ..Default::default()
            }
        }

        pub async fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().await.clone()
        }

        pub fn verification_count(&self) -> usize {
            self.verifications.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmailTransport for RecordingTransport {
        fn provider(&self) -> &'static str {
            "recording"
        }

        async fn verify(&self) -> Result<(), TransportError> {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            if self.fail_verify {
                Err(TransportError::Verification("bad credentials".to_string()))
            } else {
                Ok(())
            }
        }

        async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
            if email.to.iter().any(|to| self.fail_for.contains(to)) {
                return Err(TransportError::Api {
                    status: 422,
                    body: "recipient rejected".to_string(),
                });
            }
            self.sent.lock().await.push(email.clone());
            Ok(())
        }
    }
}
