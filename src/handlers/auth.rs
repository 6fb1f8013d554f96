use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use super::run_blocking;
use crate::db::models::{Role, User};
use crate::middleware::auth::Authenticated;
use crate::middleware::extract::ApiJson;
use crate::types::requests::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};
use crate::{HubError, router::HubState};

/// POST /login -> validates credentials and issues a bearer token.
pub async fn login(
    State(state): State<HubState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, HubError> {
    state
        .login_limiter
        .check()
        .map_err(|_| HubError::RateLimited)?;

    let users = state.users.clone();
    let user = run_blocking(move || users.login(&req.username, &req.password)).await?;
    let token = state.sessions.issue(&user)?;
    Ok(Json(LoginResponse { token }))
}

/// POST /logout -> revokes the presented token.
pub async fn logout(State(state): State<HubState>, auth: Authenticated) -> Result<StatusCode, HubError> {
    state.sessions.revoke(&auth.token)?;
    info!(user_id = auth.caller.user_id, "session revoked");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /register -> creates a regular member account with a unique username.
pub async fn register(
    State(state): State<HubState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), HubError> {
    let username = req.username.trim().to_string();
    if username.is_empty() || req.password.is_empty() {
        return Err(HubError::invalid_input("username and password are required"));
    }

    let users = state.users.clone();
    let user = run_blocking(move || {
        users.register_unique(User {
            id: 0,
            username,
            password: req.password,
            role: Role::Member,
        })
    })
    .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /me -> profile of the authenticated caller.
pub async fn me(
    State(state): State<HubState>,
    auth: Authenticated,
) -> Result<Json<UserProfile>, HubError> {
    let users = state.users.clone();
    let user = run_blocking(move || users.get_user(auth.caller.user_id)).await?;
    Ok(Json(user.into()))
}
