// src/notifications/composer.rs
//! HTML bodies and subjects for interview notifications
//!
//! One template source for both the on-demand "scheduled" emails and the
//! periodic reminders, regardless of which transport delivers them.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::common::html_escape;

/// en-US short form: `Mon, Jan 05, 2026, 03:30 PM`
const WHEN_FORMAT: &str = "%a, %b %d, %Y, %I:%M %p";

/// Name and address of someone receiving a notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationVariant {
    Scheduled { organizer_name: String },
    Reminder,
}

/// Subject, body and recipient list of one transport call
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    pub subject: String,
    pub html: String,
    pub to: Vec<String>,
}

/// The candidate message and, when anyone is assigned, the batched interviewer message
#[derive(Debug, Clone)]
pub struct ComposedNotifications {
    pub candidate: NotificationMessage,
    pub interviewers: Option<NotificationMessage>,
}

impl ComposedNotifications {
    /// Messages in delivery order
    pub fn into_messages(self) -> Vec<NotificationMessage> {
        std::iter::once(self.candidate).chain(self.interviewers).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NotificationComposer {
    display_tz: Tz,
}

impl NotificationComposer {
    pub fn new(display_tz: Tz) -> Self {
        Self { display_tz }
    }

    /// Formats an epoch-millis instant in the shared display timezone
    pub fn format_when(&self, start_time_ms: i64) -> String {
        match Utc.timestamp_millis_opt(start_time_ms).single() {
            Some(utc) => utc
                .with_timezone(&self.display_tz)
                .format(WHEN_FORMAT)
                .to_string(),
            None => start_time_ms.to_string(),
        }
    }

    pub fn compose(
        &self,
        title: &str,
        start_time_ms: i64,
        candidate: &Participant,
        interviewers: &[Participant],
        variant: &NotificationVariant,
    ) -> ComposedNotifications {
        let when = self.format_when(start_time_ms);
        let interviewer_names = interviewers
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let subject = match variant {
            NotificationVariant::Scheduled { .. } => {
                format!("Interview Scheduled: {} on {}", title, when)
            }
            NotificationVariant::Reminder => {
                format!("Reminder: Interview \"{}\" starts in 1 hour", title)
            }
        };

        let candidate_message = NotificationMessage {
            subject: subject.clone(),
            html: candidate_html(title, &when, &candidate.name, &interviewer_names, variant),
            to: vec![candidate.email.clone()],
        };

        let interviewer_message = if interviewers.is_empty() {
            None
        } else {
            Some(NotificationMessage {
                subject,
                html: interviewer_html(title, &when, &candidate.name, variant),
                to: interviewers.iter().map(|i| i.email.clone()).collect(),
            })
        };

        ComposedNotifications {
            candidate: candidate_message,
            interviewers: interviewer_message,
        }
    }
}

fn organizer_line(variant: &NotificationVariant) -> String {
    match variant {
        NotificationVariant::Scheduled { organizer_name } => format!(
            "\n        <li><strong>Scheduled by:</strong> {}</li>",
            html_escape(organizer_name)
        ),
        NotificationVariant::Reminder => String::new(),
    }
}

fn candidate_html(
    title: &str,
    when: &str,
    candidate_name: &str,
    interviewer_names: &str,
    variant: &NotificationVariant,
) -> String {
    let (lead, closing) = match variant {
        NotificationVariant::Scheduled { .. } => {
            ("<p>Your interview has been scheduled.</p>", "")
        }
        NotificationVariant::Reminder => (
            "<p><strong>This is a reminder:</strong> Your interview is scheduled to start in 1 hour.</p>",
            "\n    <p>Please make sure you're ready to join on time.</p>",
        ),
    };

    format!(
        r#"<div>
    <p>Hi {name},</p>
    {lead}
    <ul>
        <li><strong>Title:</strong> {title}</li>
        <li><strong>Date &amp; Time:</strong> {when}</li>
        <li><strong>Interviewer(s):</strong> {interviewers}</li>{organizer}
    </ul>{closing}
</div>"#,
        name = html_escape(candidate_name),
        lead = lead,
        title = html_escape(title),
        when = when,
        interviewers = html_escape(interviewer_names),
        organizer = organizer_line(variant),
        closing = closing,
    )
}

fn interviewer_html(
    title: &str,
    when: &str,
    candidate_name: &str,
    variant: &NotificationVariant,
) -> String {
    let (lead, closing) = match variant {
        NotificationVariant::Scheduled { .. } => {
            ("<p>You have been assigned to conduct an interview.</p>", "")
        }
        NotificationVariant::Reminder => (
            "<p><strong>This is a reminder:</strong> You have an interview scheduled to start in 1 hour.</p>",
            "\n    <p>Please make sure you're ready to conduct the interview.</p>",
        ),
    };

    format!(
        r#"<div>
    <p>Hello,</p>
    {lead}
    <ul>
        <li><strong>Title:</strong> {title}</li>
        <li><strong>Date &amp; Time:</strong> {when}</li>
        <li><strong>Candidate:</strong> {candidate}</li>{organizer}
    </ul>{closing}
</div>"#,
        lead = lead,
        title = html_escape(title),
        when = when,
        candidate = html_escape(candidate_name),
        organizer = organizer_line(variant),
        closing = closing,
    )
}
