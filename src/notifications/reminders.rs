// src/notifications/reminders.rs
//! Reminder scan: one email pair per interview per hour bucket
//!
//! Each invocation selects upcoming interviews starting 55 to 60 minutes from
//! now, resolves participants, and sends the reminder variant. Per-interview
//! failures are collected without aborting the batch; a transport that fails
//! its pre-flight check aborts the whole invocation.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::composer::{NotificationComposer, NotificationVariant, Participant};
use super::dedup::{ReminderClaim, ReminderDedupCache, ReminderKey};
use super::error::NotifyError;
use super::transport::Mailer;
use crate::common::{Clock, MINUTE_MS};
use crate::interviews::{Interview, InterviewStore, STATUS_UPCOMING};
use crate::users::{UserDirectory, UserIndex};

/// Start time range eligible for a 1-hour-ahead reminder, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderWindow {
    pub from_ms: i64,
    pub to_ms: i64,
}

impl ReminderWindow {
    pub const LEAD_MIN: i64 = 55 * MINUTE_MS;
    pub const LEAD_MAX: i64 = 60 * MINUTE_MS;

    pub fn starting_from(now_ms: i64) -> Self {
        Self {
            from_ms: now_ms + Self::LEAD_MIN,
            to_ms: now_ms + Self::LEAD_MAX,
        }
    }

    pub fn contains(&self, start_time_ms: i64) -> bool {
        start_time_ms >= self.from_ms && start_time_ms <= self.to_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderScanSummary {
    pub message: String,
    pub sent: usize,
    pub total: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

enum Outcome {
    Sent,
    Skipped,
    Failed(String),
}

pub struct ReminderEngine {
    interviews: Arc<dyn InterviewStore>,
    users: Arc<dyn UserDirectory>,
    cache: Arc<dyn ReminderDedupCache>,
    composer: NotificationComposer,
    clock: Arc<dyn Clock>,
}

impl ReminderEngine {
    pub fn new(
        interviews: Arc<dyn InterviewStore>,
        users: Arc<dyn UserDirectory>,
        cache: Arc<dyn ReminderDedupCache>,
        composer: NotificationComposer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            interviews,
            users,
            cache,
            composer,
            clock,
        }
    }

    pub fn cache(&self) -> &Arc<dyn ReminderDedupCache> {
        &self.cache
    }

    /// Upcoming interviews inside the window, whatever the backend returned
    async fn select(&self, window: ReminderWindow) -> Result<Vec<Interview>, NotifyError> {
        let found = self
            .interviews
            .list_starting_between(STATUS_UPCOMING, window.from_ms, window.to_ms)
            .await?;
        Ok(found
            .into_iter()
            .filter(|i| i.status == STATUS_UPCOMING && window.contains(i.start_time))
            .collect())
    }

    pub async fn run_scan(&self, mailer: &Mailer) -> Result<ReminderScanSummary, NotifyError> {
        let now = self.clock.now_millis();
        let window = ReminderWindow::starting_from(now);
        let candidates = self.select(window).await?;

        if candidates.is_empty() {
            debug!(from = window.from_ms, to = window.to_ms, "No interviews in reminder window");
            return Ok(ReminderScanSummary {
                message: "No upcoming interviews to remind".to_string(),
                sent: 0,
                total: 0,
                skipped: 0,
                errors: Vec::new(),
            });
        }

        let directory = UserIndex::new(self.users.list_users().await?);
        info!(
            interviews = candidates.len(),
            users = directory.len(),
            "Starting reminder scan"
        );

        let mut summary = ReminderScanSummary {
            message: "Reminder emails processed".to_string(),
            sent: 0,
            total: candidates.len(),
            skipped: 0,
            errors: Vec::new(),
        };
        let mut verified = false;

        for interview in &candidates {
            match self
                .process(interview, &directory, mailer, &mut verified)
                .await?
            {
                Outcome::Sent => summary.sent += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed(message) => {
                    warn!(interview_id = %interview.id, error = %message, "Reminder not sent");
                    summary.errors.push(message);
                }
            }
        }

        let evicted = self.cache.evict_stale(now).await;
        if evicted > 0 {
            info!(evicted, "Pruned reminder cache");
        }

        info!(
            total = summary.total,
            sent = summary.sent,
            skipped = summary.skipped,
            failed = summary.errors.len(),
            "Reminder scan finished"
        );
        Ok(summary)
    }

    /// Handles one interview; only a failed pre-flight verification is returned as `Err`
    async fn process(
        &self,
        interview: &Interview,
        directory: &UserIndex,
        mailer: &Mailer,
        verified: &mut bool,
    ) -> Result<Outcome, NotifyError> {
        let key = ReminderKey::new(interview.id.as_str(), interview.start_time);
        let bucket = key.hour_bucket;
        let Some(claim) = ReminderClaim::acquire(&self.cache, key).await else {
            debug!(interview_id = %interview.id, bucket, "Reminder already sent");
            return Ok(Outcome::Skipped);
        };

        let Some(candidate) = directory.get(&interview.candidate_id) else {
            claim.release().await;
            return Ok(Outcome::Failed(format!(
                "Candidate not found for interview {}",
                interview.id
            )));
        };

        let interviewers: Vec<Participant> = directory
            .resolve_all(&interview.interviewer_ids)
            .map(|u| Participant {
                name: u.name.clone(),
                email: u.email.clone(),
            })
            .collect();
        if interviewers.is_empty() {
            claim.release().await;
            return Ok(Outcome::Failed(format!(
                "No interviewers found for interview {}",
                interview.id
            )));
        }

        let candidate = Participant {
            name: candidate.name.clone(),
            email: candidate.email.clone(),
        };
        let composed = self.composer.compose(
            &interview.title,
            interview.start_time,
            &candidate,
            &interviewers,
            &NotificationVariant::Reminder,
        );

        if !*verified {
            if let Err(e) = mailer.verify().await {
                claim.release().await;
                return Err(e.into());
            }
            *verified = true;
        }

        for message in composed.into_messages() {
            if let Err(e) = mailer.deliver(&message).await {
                claim.release().await;
                return Ok(Outcome::Failed(format!(
                    "Failed to send reminder for interview {}: {}",
                    interview.id, e
                )));
            }
        }

        claim.commit().await;
        Ok(Outcome::Sent)
    }
}
