// auth - token authentication and permission evaluation

pub mod flags;
pub mod guard;
pub mod token;

pub use flags::PermissionFlag;
pub use guard::{Decision, DenyReason, Guard, PermissionEvaluator};
pub use token::{AuthError, IssuedToken, SignError, TokenAuthenticator, TokenClaims};
