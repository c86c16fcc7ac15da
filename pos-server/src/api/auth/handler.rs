//! Auth API Handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use std::time::Duration;

use crate::auth::{self, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::profile;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MIN_PASSWORD_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{AuthResponse, Profile, SignInRequest, SignUpRequest};

/// Fixed delay on failed logins, flattening the timing difference
/// between unknown accounts and wrong passwords
const LOGIN_FAILURE_DELAY: Duration = Duration::from_millis(300);

/// POST /api/auth/signup - create an account and issue a token
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignUpRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if !payload.email.contains('@') {
        return Err(AppError::validation("email is not valid"));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let profile = profile::create(
        &state.pool,
        &payload.email,
        &password_hash,
        &payload.name,
        payload.role.as_deref(),
    )
    .await?;

    let token = state
        .jwt_service
        .generate_token(&profile)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(profile_id = profile.id, "Account created");
    Ok(Json(AuthResponse { token, profile }))
}

/// POST /api/auth/login - verify credentials and issue a token
///
/// Unknown email and wrong password produce the same error and the
/// same response time.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<SignInRequest>,
) -> AppResult<Json<AuthResponse>> {
    let found = profile::find_by_email(&state.pool, &payload.email).await?;

    let profile = match found {
        Some(profile) if auth::verify_password(&payload.password, &profile.password_hash) => {
            profile
        }
        other => {
            if other.is_none() {
                // Burn comparable time even without a stored hash
                let _ = auth::hash_password(&payload.password);
            }
            tokio::time::sleep(LOGIN_FAILURE_DELAY).await;
            tracing::warn!(target: "security", email = %payload.email, "Login failed");
            return Err(AppError::invalid_credentials());
        }
    };
    let token = state
        .jwt_service
        .generate_token(&profile)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(profile_id = profile.id, "Login succeeded");
    Ok(Json(AuthResponse { token, profile }))
}

/// POST /api/auth/logout - stateless acknowledgement
///
/// Tokens are not tracked server-side; clients discard theirs.
pub async fn logout() -> AppResult<Json<bool>> {
    Ok(Json(true))
}

/// GET /api/auth/me - profile behind the presented token
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Profile>> {
    let profile = profile::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;
    Ok(Json(profile))
}
