// src/users/mod.rs

pub mod directory;
pub mod handlers;
pub mod models;
pub mod routes;


pub use directory::{SqliteUserDirectory, UserDirectory, UserIndex};
pub use models::User;
pub use routes::users_routes;
