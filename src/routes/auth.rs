//! Auth routes — registration, login, and the bearer-token extractor.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::{Json, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::routes::{ApiJson, error_body};
use crate::services::auth::{self as auth_svc, AuthError, LoginRequest, RegisterRequest, UserRow};
use crate::services::token::{self, TokenError};
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated identity recovered from the `Authorization: Bearer` header.
/// Use as a handler parameter to require a valid, unexpired token.
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

/// Pull the bearer token out of an Authorization header value.
///
/// The auth scheme is matched case-insensitively per RFC 7235.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let Some(raw) = bearer_token(header) else {
            return Err(error_body(StatusCode::UNAUTHORIZED, "missing bearer token"));
        };

        let app_state = AppState::from_ref(state);
        let identity = token::validate(&app_state.auth, raw).map_err(|e| match e {
            TokenError::Expired => error_body(StatusCode::UNAUTHORIZED, "token expired"),
            TokenError::Invalid(_) => error_body(StatusCode::UNAUTHORIZED, "token invalid"),
        })?;

        Ok(Self { user_id: identity.user_id, email: identity.email, name: identity.name })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserRow,
}

fn issue_for(state: &AppState, user: UserRow) -> Result<AuthResponse, Response> {
    let token = token::issue(&state.auth, user.id, &user.email, &user.name).map_err(|e| {
        tracing::error!(error = %e, "token issuance failed");
        error_body(StatusCode::INTERNAL_SERVER_ERROR, "token issuance failed")
    })?;
    Ok(AuthResponse { token, user })
}

pub(crate) fn auth_error_to_response(err: &AuthError) -> Response {
    match err {
        AuthError::InvalidCredentials => error_body(StatusCode::UNAUTHORIZED, &err.to_string()),
        AuthError::InvalidEmail
        | AuthError::PasswordTooShort
        | AuthError::EmptyName
        | AuthError::EmailTaken => error_body(StatusCode::BAD_REQUEST, &err.to_string()),
        AuthError::Hash(_) | AuthError::Db(_) => {
            tracing::error!(error = %err, "auth storage failure");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

/// `POST /api/auth/register` — create an account and issue a session token.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), Response> {
    let user = auth_svc::register(&state.pool, &body)
        .await
        .map_err(|e| auth_error_to_response(&e))?;
    let response = issue_for(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/auth/login` — verify credentials and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, Response> {
    let user = auth_svc::login(&state.pool, &body)
        .await
        .map_err(|e| auth_error_to_response(&e))?;
    let response = issue_for(&state, user)?;
    Ok(Json(response))
}

#[derive(Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// `GET /api/auth/me` — identity asserted by the presented token.
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse { id: auth.user_id, email: auth.email, name: auth.name })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
