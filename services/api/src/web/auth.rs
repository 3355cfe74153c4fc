//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration, login, logout, and
//! fetching the current user.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use hiddenheu_core::domain::{Language, NewUser};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::middleware::{session_token, CurrentUser};
use crate::web::rest::{fail, store_error, ApiFailure, UserPayload};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: Option<String>,
    pub preferred_language: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

//=========================================================================================
// Password and Cookie Helpers
//=========================================================================================

fn hash_password(password: &str) -> Result<String, ApiFailure> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            fail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error during registration",
            )
        })
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn session_cookie(token: &str, ttl_days: i64) -> String {
    format!(
        "session={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        token,
        Duration::days(ttl_days).num_seconds()
    )
}

fn cleared_session_cookie() -> &'static str {
    "session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0"
}

/// Creates a fresh session for the user and returns its Set-Cookie value.
async fn open_session(state: &AppState, user_id: i32) -> Result<String, ApiFailure> {
    let token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(state.config.session_ttl_days);
    state
        .store
        .create_auth_session(&token, user_id, expires_at)
        .await
        .map_err(store_error)?;
    Ok(session_cookie(&token, state.config.session_ttl_days))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserPayload),
        (status = 400, description = "Invalid data or duplicate username/email", body = crate::web::rest::ApiMessage),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    // 1. Validate the request body.
    if req.username.trim().is_empty() || req.password.is_empty() || req.email.trim().is_empty() {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid data"));
    }
    if !req.email.contains('@') {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid data"));
    }
    let preferred_language = match &req.preferred_language {
        Some(raw) => raw
            .parse::<Language>()
            .map_err(|_| fail(StatusCode::BAD_REQUEST, "Invalid data"))?,
        None => Language::default(),
    };

    // 2. Reject duplicates. Uniqueness is case-insensitive and is this
    // layer's responsibility; the store does not enforce it.
    if state
        .store
        .get_user_by_username(&req.username)
        .await
        .map_err(store_error)?
        .is_some()
    {
        return Err(fail(StatusCode::BAD_REQUEST, "Username already exists"));
    }
    if state
        .store
        .get_user_by_email(&req.email)
        .await
        .map_err(store_error)?
        .is_some()
    {
        return Err(fail(StatusCode::BAD_REQUEST, "Email already exists"));
    }

    // 3. Hash the password and create the user.
    let password_hash = hash_password(&req.password)?;
    let user = state
        .store
        .create_user(NewUser {
            username: req.username,
            password: password_hash,
            email: req.email,
            full_name: req.full_name,
            preferred_language,
        })
        .await
        .map_err(store_error)?;

    // 4. Open a session and return the user with the cookie set.
    let cookie = open_session(&state, user.id).await?;
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "user": UserPayload::from(user) })),
    ))
}

/// POST /api/auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserPayload),
        (status = 400, description = "Missing username or password", body = crate::web::rest::ApiMessage),
        (status = 401, description = "Invalid credentials", body = crate::web::rest::ApiMessage)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        ));
    }

    let user = state
        .store
        .get_user_by_username(&req.username)
        .await
        .map_err(store_error)?;

    // A missing user and a wrong password answer identically.
    let user = match user {
        Some(user) if verify_password(&req.password, &user.password) => user,
        _ => return Err(fail(StatusCode::UNAUTHORIZED, "Invalid credentials")),
    };

    let cookie = open_session(&state, user.id).await?;
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "user": UserPayload::from(user) })),
    ))
}

/// POST /api/auth/logout - Logout and invalidate the session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, ApiFailure> {
    // Logout is permissive: with no session cookie there is nothing to
    // invalidate and the call still succeeds.
    if let Some(token) = session_token(&headers) {
        state
            .store
            .delete_auth_session(token)
            .await
            .map_err(store_error)?;
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cleared_session_cookie().to_string())],
        Json(json!({ "success": true })),
    ))
}

/// GET /api/auth/me - Return the currently authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The current user", body = UserPayload),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiFailure> {
    let user = state
        .store
        .get_user(user_id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "User not found"))?;

    Ok(Json(json!({ "user": UserPayload::from(user) })))
}

//=========================================================================================
// Tests
//=========================================================================================
