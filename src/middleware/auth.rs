//! JWT authentication extractor for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::auth as auth_service;
use crate::AppState;

/// Name of the http-only session cookie.
pub const AUTH_COOKIE: &str = "lifedash_token";

/// Authenticated user extracted from the session token.
///
/// The token is taken from the `Authorization: Bearer` header when present,
/// falling back to the session cookie. Use as an Axum extractor in handlers
/// that require authentication:
/// ```ignore
/// async fn handler(current_user: CurrentUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(AUTH_COOKIE)
                .map(|c| c.value().to_string())
                .ok_or(AppError::Unauthorized)?,
        };

        let claims = auth_service::validate_token(&token, &state.config.jwt_secret)?;

        let user_id: Uuid = claims
            .user_id
            .parse()
            .map_err(|_| AppError::Unauthorized)?;

        Ok(CurrentUser {
            id: user_id,
            email: claims.sub,
        })
    }
}
