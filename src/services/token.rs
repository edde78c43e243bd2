//! Session-token issuance and validation.
//!
//! DESIGN
//! ======
//! Tokens are stateless HS256 JWTs signed with the symmetric key from
//! `AuthConfig`. Integrity rests entirely on the signature; validation
//! enforces issuer, audience, and expiry with zero leeway so the expiry
//! boundary is exact. There is no refresh flow — an expired token simply
//! forces a new login.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::AuthConfig;

const SECONDS_PER_HOUR: i64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature verified but the token is past its expiry. Callers may
    /// prompt for re-authentication.
    #[error("token expired")]
    Expired,
    /// Malformed token, bad signature, or wrong issuer/audience.
    #[error("token invalid: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Claims carried by an issued session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringified UUID.
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Unique token id, fresh per issuance.
    pub jti: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Identity recovered from a validated token.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

/// Issue a signed session token for the given user.
///
/// # Errors
///
/// Returns `TokenError::Invalid` if signing fails.
pub fn issue(cfg: &AuthConfig, user_id: Uuid, email: &str, name: &str) -> Result<String, TokenError> {
    issue_at(cfg, user_id, email, name, OffsetDateTime::now_utc().unix_timestamp())
}

/// Issue a token as of an explicit issuance instant. Seam for expiry tests;
/// production callers go through [`issue`].
pub(crate) fn issue_at(
    cfg: &AuthConfig,
    user_id: Uuid,
    email: &str,
    name: &str,
    issued_at: i64,
) -> Result<String, TokenError> {
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        name: name.to_owned(),
        jti: Uuid::new_v4().to_string(),
        iat: issued_at,
        exp: issued_at + cfg.token_lifetime_hours * SECONDS_PER_HOUR,
        iss: cfg.issuer.clone(),
        aud: cfg.audience.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(cfg.signing_key.as_bytes()),
    )
    .map_err(TokenError::Invalid)
}

/// Validate a session token and recover the identity it asserts.
///
/// # Errors
///
/// `TokenError::Expired` when the signature verifies but expiry has passed;
/// `TokenError::Invalid` for every other defect (bad signature, malformed
/// token, issuer/audience mismatch, unparseable subject).
pub fn validate(cfg: &AuthConfig, token: &str) -> Result<TokenIdentity, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&cfg.issuer]);
    validation.set_audience(&[&cfg.audience]);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.signing_key.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e),
    })?;

    let user_id = Uuid::parse_str(&data.claims.sub)
        .map_err(|_| TokenError::Invalid(ErrorKind::InvalidSubject.into()))?;

    Ok(TokenIdentity { user_id, email: data.claims.email, name: data.claims.name })
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
