//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the HTTP surface: auth endpoints, public catalog listings, and
//! identity-scoped order endpoints. Errors surface as an HTTP status plus a
//! JSON `{"message": ...}` body.

pub mod auth;
pub mod catalog;
pub mod orders;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/catalog/doughs", get(catalog::list_doughs))
        .route("/api/catalog/frostings", get(catalog::list_frostings))
        .route("/api/catalog/fillings", get(catalog::list_fillings))
        .route("/api/orders", get(orders::list_orders).post(orders::create_order))
        .route("/api/orders/{id}", get(orders::get_order))
        .route("/api/orders/{id}/status", patch(orders::update_status))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Uniform error body: status plus a human-readable message.
pub(crate) fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "message": message }))).into_response()
}

/// JSON body extractor whose rejection follows the uniform error body.
///
/// Axum's stock `Json` rejection answers malformed input with a plain-text
/// 422; every handler taking a request body goes through this wrapper so
/// clients always see a 400 with `{"message": ...}`.
#[derive(Debug)]
pub(crate) struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(error_body(StatusCode::BAD_REQUEST, &rejection.body_text())),
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
