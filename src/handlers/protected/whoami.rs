use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub username: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// GET /auth/whoami - echo the identity carried by the caller's token
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<WhoamiResponse> {
    Ok(ApiResponse::success(WhoamiResponse {
        username: user.username,
        expires_at: user.expires_at,
    }))
}
