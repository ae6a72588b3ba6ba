// Application state shared across all modules

use std::sync::Arc;

use super::clock::Clock;
use crate::interviews::InterviewStore;
use crate::notifications::NotificationService;
use crate::users::UserDirectory;

/// Application state containing the stores, the notification pipeline and auth secrets
#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: String,
    /// Shared secret expected on the reminder trigger; `None` leaves it open
    pub cron_secret: Option<String>,
    pub clock: Arc<dyn Clock>,
    pub interviews: Arc<dyn InterviewStore>,
    pub users: Arc<dyn UserDirectory>,
    pub notifications: NotificationService,
}
