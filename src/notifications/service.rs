// src/notifications/service.rs

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::composer::NotificationComposer;
use super::error::{MailerUnavailable, NotifyError};
use super::reminders::{ReminderEngine, ReminderScanSummary};
use super::scheduled::{send_scheduled, ScheduleNotificationRequest};
use super::transport::Mailer;

/// Entry point for both notification flows
///
/// A missing or broken mailer is kept rather than failing startup; each
/// invocation reports it as a configuration error before doing any work.
#[derive(Clone)]
pub struct NotificationService {
    mailer: Result<Mailer, MailerUnavailable>,
    composer: NotificationComposer,
    reminders: Arc<ReminderEngine>,
}

impl NotificationService {
    pub fn new(
        mailer: Result<Mailer, MailerUnavailable>,
        composer: NotificationComposer,
        reminders: ReminderEngine,
    ) -> Self {
        Self {
            mailer,
            composer,
            reminders: Arc::new(reminders),
        }
    }

    fn mailer(&self) -> Result<&Mailer, NotifyError> {
        self.mailer.as_ref().map_err(|e| e.clone().into())
    }

    pub fn reminders(&self) -> &ReminderEngine {
        &self.reminders
    }

    pub async fn send_scheduled(&self, request: &ScheduleNotificationRequest) -> Result<(), NotifyError> {
        let mailer = self.mailer()?;
        send_scheduled(mailer, &self.composer, request).await
    }

    pub async fn run_reminder_scan(&self) -> Result<ReminderScanSummary, NotifyError> {
        let mailer = self.mailer()?;
        self.reminders.run_scan(mailer).await
    }

    /// Runs the reminder scan on a fixed period for deployments without an external scheduler
    pub fn start_reminder_ticker(&self, period: Duration) {
        let service = self.clone();
        info!(period_secs = period.as_secs(), "Starting in-process reminder ticker");
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match service.run_reminder_scan().await {
                    Ok(summary) => info!(
                        sent = summary.sent,
                        total = summary.total,
                        errors = summary.errors.len(),
                        "Scheduled reminder scan completed"
                    ),
                    Err(e) => error!(error = %e, "Scheduled reminder scan failed"),
                }
            }
        });
    }
}
