// services - domain logic between handlers and the store

pub mod user_service;

pub use user_service::{RegisterUser, UserError, UserService, UserUpdate};
