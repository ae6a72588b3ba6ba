// Common module - shared types and utilities across all modules

pub mod clock;
pub mod config;
pub mod error;
pub mod helpers;
pub mod id_generator;
pub mod migrations;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use clock::{Clock, SystemClock, HOUR_MS, MINUTE_MS};
pub use error::{ApiError, StoreError};
pub use helpers::{html_escape, safe_email_list_log, safe_email_log};
pub use id_generator::*;
pub use state::AppState;
pub use validation::{looks_like_email, ValidationError, ValidationResult, Validator};

#[cfg(test)]
pub mod test_support;
