// src/notifications/transport/smtp.rs
//! Authenticated SMTP relay via lettre

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{EmailTransport, OutgoingEmail, SmtpSettings, TransportError};

/// Port that speaks TLS from the first byte; every other port upgrades with STARTTLS
const IMPLICIT_TLS_PORT: u16 = 465;

pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    pub fn new(settings: &SmtpSettings) -> Result<Self, TransportError> {
        let builder = if settings.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| TransportError::Smtp(e.to_string()))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| TransportError::Address(format!("{}: {}", address, e)))
}

/// One HTML message addressed to every recipient in `email.to`
pub fn build_message(email: &OutgoingEmail) -> Result<Message, TransportError> {
    if email.to.is_empty() {
        return Err(TransportError::Message("no recipients".to_string()));
    }

    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML);

    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }

    builder
        .body(email.html.clone())
        .map_err(|e| TransportError::Message(e.to_string()))
}

#[async_trait]
impl EmailTransport for SmtpTransport {
    fn provider(&self) -> &'static str {
        "smtp"
    }

    async fn verify(&self) -> Result<(), TransportError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransportError::Verification(
                "SMTP server did not accept the connection".to_string(),
            )),
            Err(e) => Err(TransportError::Verification(e.to_string())),
        }
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
        let message = build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| TransportError::Smtp(e.to_string()))?;
        Ok(())
    }
}
