//! Authentication routes: register, login, logout, profile.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::{CurrentUser, AUTH_COOKIE};
use crate::models::user::UserResponse;
use crate::services::auth as auth_service;
use crate::validation::{is_valid_email, is_valid_password, sanitize_name};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session payload returned on register and login. The token is also set as
/// an http-only cookie for browser clients.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}

fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>), AppError> {
    if !is_valid_email(&body.email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if !is_valid_password(&body.password) {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    let name = sanitize_name(&body.name);
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let email = body.email.trim().to_lowercase();
    let user = auth_service::register(&state.db, &email, &body.password, &name).await?;
    let token = auth_service::generate_token(
        &user,
        &state.config.jwt_secret,
        state.config.jwt_token_expiry_secs,
    )?;

    let jar = jar.add(session_cookie(
        token.clone(),
        state.config.jwt_token_expiry_secs,
    ));
    Ok((
        jar,
        ApiResponse::success(SessionResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>), AppError> {
    let email = body.email.trim().to_lowercase();
    let (user, token) = auth_service::login(
        &state.db,
        &email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_token_expiry_secs,
    )
    .await?;

    let jar = jar.add(session_cookie(
        token.clone(),
        state.config.jwt_token_expiry_secs,
    ));
    Ok((
        jar,
        ApiResponse::success(SessionResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// POST /api/auth/logout — clears the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<&'static str>>) {
    let jar = jar.remove(Cookie::build((AUTH_COOKIE, "")).path("/").build());
    (jar, ApiResponse::success("Logged out"))
}

/// GET /api/auth/me — current user profile.
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = auth_service::find_user_by_id(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}
