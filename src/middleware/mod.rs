pub mod auth;
pub mod response;

pub use auth::require_authentication;
pub use response::{ApiResponse, ApiResult};
