//! Typed startup configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! The signing key, issuer/audience strings, token lifetime, and database
//! connection settings are supplied externally and captured once at startup
//! into immutable values. A malformed numeric variable is a boot failure,
//! not a silent fallback. Nothing reads these variables after boot.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {raw}")]
    InvalidValue { var: &'static str, raw: String },
}

pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

/// Signing material and token policy for session-token issuance.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub signing_key: String,
    pub issuer: String,
    pub audience: String,
    pub token_lifetime_hours: i64,
}

impl AuthConfig {
    /// Build typed auth config from environment variables.
    ///
    /// Required:
    /// - `JWT_SECRET`: symmetric signing key
    /// - `JWT_ISSUER`, `JWT_AUDIENCE`: claim values enforced on validation
    ///
    /// Optional:
    /// - `TOKEN_LIFETIME_HOURS`: default 24
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is absent or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let signing_key = require_var("JWT_SECRET")?;
        let issuer = require_var("JWT_ISSUER")?;
        let audience = require_var("JWT_AUDIENCE")?;
        let token_lifetime_hours =
            optional_positive("TOKEN_LIFETIME_HOURS", DEFAULT_TOKEN_LIFETIME_HOURS)?;

        Ok(Self { signing_key, issuer, audience, token_lifetime_hours })
    }
}

pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Connection settings for the relational store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DbConfig {
    /// Build typed database config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`: `PostgreSQL` connection string
    ///
    /// Optional:
    /// - `DB_MAX_CONNECTIONS`: pool ceiling, default 5
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATABASE_URL` is absent or the pool ceiling
    /// fails to parse as a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = require_var("DATABASE_URL")?;
        let max_connections =
            optional_positive("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;

        Ok(Self { url, max_connections })
    }
}

fn require_var(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(var))
}

/// Parse an optional numeric variable, rejecting zero and negatives.
fn optional_positive<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .filter(|n| *n > T::default())
            .ok_or(ConfigError::InvalidValue { var, raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
