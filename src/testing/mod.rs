// testing - shared fixtures for unit tests

use chrono::Duration;
use uuid::Uuid;

use crate::auth::{TokenAuthenticator, TokenClaims};

/// Signing secret shared by unit-test authenticators.
pub const JWT_SECRET: &[u8] = b"unit-test-signing-secret";

/// Authenticator over [`JWT_SECRET`] with a one-hour token lifetime.
pub fn fixture_authenticator() -> TokenAuthenticator {
    TokenAuthenticator::new(JWT_SECRET, Duration::hours(1))
}

/// Claims with a wide-open validity window, for guard tests where only the
/// subject and permission mask matter.
pub fn claims(sub: Uuid, mask: u32) -> TokenClaims {
    TokenClaims {
        sub,
        permissions: mask,
        iat: 0,
        exp: i64::MAX,
    }
}
