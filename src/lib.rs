pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod store;

#[cfg(test)]
pub mod testing;

use auth::TokenAuthenticator;
use services::UserService;

/// Shared state handed to routers and the authentication middleware.
///
/// Both members are cheap to clone: the authenticator holds key material and
/// the service shares one store behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenAuthenticator,
    pub users: UserService,
}
