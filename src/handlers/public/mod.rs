// handlers/public/mod.rs - handlers that do not require authentication

pub mod auth;
pub mod users;
