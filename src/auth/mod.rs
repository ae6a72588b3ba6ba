//! # Auth Module
//!
//! Request authentication for the API:
//! - `AuthedUser` validates HS256 bearer tokens issued by the identity provider
//! - `CronCaller` checks the shared secret on the reminder trigger

pub mod extractors;
pub mod models;

#[cfg(test)]
mod tests;

pub use extractors::{AuthedUser, CronCaller};
pub use models::Claims;
