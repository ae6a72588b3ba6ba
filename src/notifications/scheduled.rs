// src/notifications/scheduled.rs
//! "Interview scheduled" emails sent right after an interview is created

use serde::Deserialize;
use tracing::info;

use super::composer::{NotificationComposer, NotificationVariant, Participant};
use super::error::NotifyError;
use super::transport::Mailer;
use crate::common::{looks_like_email, ValidationResult, Validator};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleNotificationRequest {
    pub title: String,
    pub start_time: i64,
    pub candidate: Participant,
    pub interviewers: Vec<Participant>,
    pub organizer_name: String,
}

pub struct ScheduleNotificationValidator;

impl Validator<ScheduleNotificationRequest> for ScheduleNotificationValidator {
    fn validate(&self, data: &ScheduleNotificationRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.trim().is_empty() {
            result.add_error("title", "Title is required");
        }
        if data.start_time <= 0 {
            result.add_error("startTime", "Start time must be a positive epoch timestamp");
        }
        if data.candidate.name.trim().is_empty() {
            result.add_error("candidate.name", "Candidate name is required");
        }
        if !looks_like_email(&data.candidate.email) {
            result.add_error("candidate.email", "Candidate email is invalid");
        }
        for (i, interviewer) in data.interviewers.iter().enumerate() {
            if interviewer.name.trim().is_empty() {
                result.add_error(&format!("interviewers[{}].name", i), "Interviewer name is required");
            }
            if !looks_like_email(&interviewer.email) {
                result.add_error(&format!("interviewers[{}].email", i), "Interviewer email is invalid");
            }
        }
        if data.organizer_name.trim().is_empty() {
            result.add_error("organizerName", "Organizer name is required");
        }

        result
    }
}

/// Candidate first, then the interviewer batch
///
/// Not atomic: a delivered candidate email stays delivered when the interviewer send fails.
pub async fn send_scheduled(
    mailer: &Mailer,
    composer: &NotificationComposer,
    request: &ScheduleNotificationRequest,
) -> Result<(), NotifyError> {
    let composed = composer.compose(
        &request.title,
        request.start_time,
        &request.candidate,
        &request.interviewers,
        &NotificationVariant::Scheduled {
            organizer_name: request.organizer_name.clone(),
        },
    );

    mailer.verify().await?;

    let mut deliveries = Vec::new();
    for message in composed.into_messages() {
        deliveries.push(mailer.deliver(&message).await?);
    }

    info!(
        title = %request.title,
        interviewers = request.interviewers.len(),
        deliveries = ?deliveries,
        "Scheduling emails sent"
    );
    Ok(())
}
