// ---------------------------------------------------------------------------
// Authentication middleware
// ---------------------------------------------------------------------------

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::ApiErrorBody;
use crate::state::AppState;

/// Middleware that validates the optional bearer token.
///
/// If the server was started without `--api-key`, all requests are allowed.
/// If `--api-key` was provided, requests must include a matching
/// `Authorization: Bearer <token>` header.
///
/// Tokens are compared as SHA-256 hashes in constant time.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiErrorBody>)> {
    let Some(ref expected_hash) = state.api_key_hash else {
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            let token = &header[7..];
            let provided_hash = Sha256::digest(token.as_bytes());
            if bool::from(expected_hash.ct_eq(provided_hash.as_slice())) {
                Ok(next.run(request).await)
            } else {
                Err(unauthorized("invalid_token", "Invalid API key"))
            }
        }
        Some(_) => Err(unauthorized(
            "invalid_scheme",
            "Expected 'Bearer <token>' authorization",
        )),
        None => Err(unauthorized(
            "missing_token",
            "Authorization header required",
        )),
    }
}

fn unauthorized(error: &str, message: &str) -> (StatusCode, Json<ApiErrorBody>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiErrorBody {
            error: error.into(),
            message: message.into(),
        }),
    )
}
