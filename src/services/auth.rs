//! Credential service — registration and login.
//!
//! DESIGN
//! ======
//! Passwords are stored only as argon2 PHC hashes with per-password salts.
//! Login treats an unknown email and a wrong password identically: both
//! return `InvalidCredentials`, and the unknown-email path still runs a
//! verification against a fixed dummy hash so the two failures are not
//! distinguishable by timing.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("name must not be empty")]
    EmptyName,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// User row as exposed to callers. The password hash never leaves this module.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, serde::Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Lowercase-normalize an email address. Registration and login both go
/// through this, so lookups are effectively case-insensitive.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

/// Hash a password into an argon2 PHC string with a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::Hash` if the hasher rejects the input.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored PHC hash string.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Fixed hash verified against when the email is unknown, so the
/// unknown-email and wrong-password paths cost the same.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("dummy-password-for-timing").unwrap_or_default())
}

/// Register a new user. Stores only the password hash, never the plaintext.
///
/// # Errors
///
/// `EmailTaken` when the normalized email already exists; validation errors
/// for malformed input; `Db` on storage failure.
pub async fn register(pool: &PgPool, req: &RegisterRequest) -> Result<UserRow, AuthError> {
    let email = normalize_email(&req.email).ok_or(AuthError::InvalidEmail)?;
    if req.name.trim().is_empty() {
        return Err(AuthError::EmptyName);
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }

    let password_hash = hash_password(&req.password)?;

    let row = sqlx::query_as::<_, (Uuid, OffsetDateTime)>(
        "INSERT INTO users (name, email, password_hash, phone)
         VALUES ($1, $2, $3, $4)
         RETURNING id, created_at",
    )
    .bind(req.name.trim())
    .bind(&email)
    .bind(&password_hash)
    .bind(&req.phone)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
            AuthError::EmailTaken
        } else {
            AuthError::Db(e)
        }
    })?;

    Ok(UserRow {
        id: row.0,
        name: req.name.trim().to_owned(),
        email,
        phone: req.phone.clone(),
        created_at: row.1,
    })
}

/// Verify credentials and return the user on success.
///
/// # Errors
///
/// `InvalidCredentials` for unknown email OR wrong password — deliberately
/// the same error in both cases; `Db` on storage failure.
pub async fn login(pool: &PgPool, req: &LoginRequest) -> Result<UserRow, AuthError> {
    let email = normalize_email(&req.email).ok_or(AuthError::InvalidCredentials)?;

    let row = sqlx::query_as::<_, (Uuid, String, String, Option<String>, OffsetDateTime, String)>(
        "SELECT id, name, email, phone, created_at, password_hash
         FROM users
         WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?;

    let Some((id, name, email, phone, created_at, password_hash)) = row else {
        // Burn the same verification cost as the wrong-password path.
        let _ = verify_password(&req.password, dummy_hash());
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(&req.password, &password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(UserRow { id, name, email, phone, created_at })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
