// src/interviews/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod validators;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use models::{Interview, STATUS_COMPLETED, STATUS_UPCOMING};
pub use routes::interviews_routes;
pub use store::{InterviewStore, SqliteInterviewStore};
