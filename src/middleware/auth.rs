use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use crate::auth::{Claims, TokenService};
use crate::error::ApiError;

/// Authenticated caller extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            expires_at: claims.expires_at(),
            username: claims.username,
        }
    }
}

/// Rejects the request with 401 unless it carries a valid bearer token.
/// The downstream handler only runs after verification succeeds.
pub async fn jwt_auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        tracing::warn!(path = %request.uri().path(), "Rejected request: {}", msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = tokens.verify_token(token).map_err(|e| {
        let reason = std::error::Error::source(&e).map(|s| s.to_string()).unwrap_or_default();
        tracing::warn!(path = %request.uri().path(), %reason, "Rejected token");
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty bearer token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}
