// src/notifications/transport/resend.rs
//! Resend transactional email API

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{EmailTransport, OutgoingEmail, ResendSettings, TransportError};
use crate::common::helpers::safe_token_log;

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Clone)]
pub struct ResendTransport {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl ResendTransport {
    pub fn new(http: reqwest::Client, settings: &ResendSettings) -> Self {
        Self {
            http,
            api_key: settings.api_key.clone(),
            api_url: settings.api_url.clone(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<(), TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl EmailTransport for ResendTransport {
    fn provider(&self) -> &'static str {
        "resend"
    }

    /// Lists sending domains, which only succeeds with a valid key
    async fn verify(&self) -> Result<(), TransportError> {
        debug!(api_key = %safe_token_log(&self.api_key), "Verifying Resend API key");
        let response = self
            .http
            .get(format!("{}/domains", self.api_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::check(response)
            .await
            .map_err(|e| TransportError::Verification(e.to_string()))
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
        let body = SendEmailBody {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await
    }
}
