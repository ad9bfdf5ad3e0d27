use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::flags::PermissionFlag;

/// Decoded payload of a validated access token.
///
/// Constructed once per request by [`TokenAuthenticator::authenticate`] and
/// immutable afterwards; handlers receive it through request extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id).
    pub sub: Uuid,
    /// Permission bitmask held by the subject at issue time.
    pub permissions: u32,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn flags(&self) -> PermissionFlag {
        PermissionFlag::from_mask(self.permissions)
    }
}

/// A freshly signed token plus its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Authentication failures. All four map to HTTP 401 at the boundary but
/// stay distinct so logs can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization credential")]
    MissingCredential,
    #[error("Malformed bearer token")]
    MalformedToken,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token expired or not yet valid")]
    Expired,
}

/// Failure signing a new token. Practically unreachable with a usable key;
/// surfaced as a 500 at the boundary.
#[derive(Debug, thiserror::Error)]
#[error("Token generation failed: {0}")]
pub struct SignError(#[from] jsonwebtoken::errors::Error);

/// Signs and verifies HS256 access tokens.
///
/// The signing secret and token lifetime are injected at construction, never
/// read from ambient state, so the authenticator can be exercised with
/// fixture keys.
#[derive(Clone)]
pub struct TokenAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthenticator {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            ttl,
        }
    }

    /// Sign fresh claims for `user_id` carrying the given permission mask.
    pub fn issue(&self, user_id: Uuid, flags: PermissionFlag) -> Result<IssuedToken, SignError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id,
            permissions: flags.bits(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl.num_seconds(),
        })
    }

    /// Validate a raw `Authorization` header value and extract its claims.
    ///
    /// Failure taxonomy: absent or blank header is `MissingCredential`; a
    /// non-Bearer scheme or an undecodable token is `MalformedToken`; a
    /// well-formed token that fails signature verification is
    /// `InvalidSignature`; a well-signed token outside its validity window
    /// is `Expired`. Signature validity is checked before temporal validity,
    /// so a tampered expired token reports `InvalidSignature`.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<TokenClaims, AuthError> {
        let header = authorization.ok_or(AuthError::MissingCredential)?;
        if header.trim().is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedToken)?
            .trim();
        if token.is_empty() {
            return Err(AuthError::MalformedToken);
        }

        let data =
            decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => AuthError::Expired,
                    _ => AuthError::MalformedToken,
                }
            })?;

        // jsonwebtoken does not validate iat; a token stamped in the future
        // is not yet valid.
        let claims = data.claims;
        if claims.iat > Utc::now().timestamp() + self.validation.leeway as i64 {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}
