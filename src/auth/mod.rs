//! Session-token authentication module.
//!
//! Passwords are stored as salted SHA-256 digests; digest comparison is
//! constant-time to mitigate timing attacks.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::db::Repository;
use crate::errors::{codes, ErrorDetails, ErrorResponse};
use crate::models::User;

/// Authenticated user injected into request extensions by the auth layer.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Hash a password with a fresh random salt. Format: `<salt>$<hex digest>`.
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

/// Verify a password against a stored `<salt>$<hex digest>` value.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    let computed = digest(salt, password);
    computed.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Session authentication layer. Resolves the bearer token to a user and
/// stores it in request extensions for handlers to pick up.
pub async fn session_auth_layer(repo: Arc<Repository>, mut request: Request, next: Next) -> Response {
    let Some(token) = bearer_token(&request) else {
        return unauthorized_response("Missing bearer token");
    };

    match repo.get_session_user(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(AuthUser(user));
            next.run(request).await
        }
        Ok(None) => unauthorized_response("Invalid or expired session"),
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            unauthorized_response("Invalid or expired session")
        }
    }
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
