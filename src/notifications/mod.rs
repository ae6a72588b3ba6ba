// src/notifications/mod.rs
//! Interview emails: scheduling notices sent on demand and deduplicated reminders

pub mod composer;
pub mod dedup;
pub mod error;
pub mod handlers;
pub mod reminders;
pub mod routes;
pub mod scheduled;
pub mod service;
pub mod transport;


pub use composer::{NotificationComposer, NotificationMessage, NotificationVariant, Participant};
pub use dedup::{EvictionPolicy, InMemoryReminderCache, ReminderDedupCache, ReminderKey};
pub use error::{MailerUnavailable, NotifyError};
pub use reminders::{ReminderEngine, ReminderScanSummary, ReminderWindow};
pub use routes::notifications_routes;
pub use service::NotificationService;
pub use transport::{build_mailer, EmailConfig, Mailer};
