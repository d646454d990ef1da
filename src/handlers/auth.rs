// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{
        LoginRequest, NewUser, RegisterRequest, RegisteredUser, SessionResponse, TokenResponse,
    },
    store::{ContentStore, StoreError},
    utils::{
        jwt::{Session, sign_jwt},
        password::{hash_password, verify_password},
    },
};

/// Registers a new author.
///
/// Hashes the password using Argon2 and creates the author profile in the
/// same write. Returns 201 Created with the user and profile.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Author registered", body = RegisteredUser),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn register(
    State(store): State<Arc<dyn ContentStore>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let password_hash = hash_password(&payload.password)?;
    let display_name = payload
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(&payload.username)
        .to_string();

    let (user, profile) = store
        .insert_user(NewUser {
            username: payload.username.clone(),
            password_hash,
            display_name,
            bio: payload.bio.clone(),
        })
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => {
                AppError::Conflict(format!("Username '{}' already exists", payload.username))
            }
            other => {
                tracing::error!("Failed to register user: {}", other);
                AppError::from(other)
            }
        })?;

    tracing::info!(user_id = user.id, "Author registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            username: user.username,
            profile,
        }),
    ))
}

/// Authenticates a user and returns a JWT token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Bad credentials")
    )
)]
pub async fn login(
    State(store): State<Arc<dyn ContentStore>>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = store
        .user_by_username(&payload.username)
        .await?
        .ok_or(AppError::AuthError("Invalid username or password".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::AuthError("Invalid username or password".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: config.jwt_expiration,
    }))
}

/// Reports who is signed in. Anonymous sessions are not an error.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    responses((status = 200, description = "Current session", body = SessionResponse))
)]
pub async fn current_session(
    State(store): State<Arc<dyn ContentStore>>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let response = match session {
        Session::Anonymous => SessionResponse {
            authenticated: false,
            user_id: None,
            username: None,
            profile: None,
        },
        Session::Authenticated(user) => SessionResponse {
            authenticated: true,
            user_id: Some(user.user_id),
            profile: store.profile_for_user(user.user_id).await?,
            username: Some(user.username),
        },
    };

    Ok(Json(response))
}
