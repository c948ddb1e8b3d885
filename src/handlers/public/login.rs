use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AuthState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /login - exchange a username/password pair for a session token
///
/// ```json
/// { "username": "test", "password": "test" }
/// ```
///
/// Responds `{"token": "..."}` on success and 401 when the pair is rejected.
pub async fn login(
    State(auth): State<AuthState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    if !auth.credentials.verify(&payload.username, &payload.password).await {
        tracing::warn!(username = %payload.username, "Login rejected");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = auth.tokens.issue_token(&payload.username)?;
    tracing::info!(username = %payload.username, "Issued session token");

    Ok(ApiResponse::success(LoginResponse { token }))
}
