use crate::{
    auth::{AuthUser, create_token},
    dto::{AuthResponse, DeleteUserResponse, LoginRequest, SignupRequest, UserResponse},
    errors::ApiError,
    models::User,
    states::AppState,
};
use axum::{Json, extract::State};
use bcrypt::{hash, verify};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// POST /auth/signup
/// Body: { "email": "...", "username": "...", "password": "..." }
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    if state.db.users.find_by_email(&payload.email).is_some() {
        return Err(ApiError::UserAlreadyExists);
    }

    let hashed_password = hash(&payload.password, state.config.bcrypt_cost)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = User {
        id: Uuid::new_v4(),
        email: payload.email,
        username: payload.username,
        hashed_password,
        created_at: Utc::now(),
    };

    let token = create_token(&user.id, &user.email, &state.config.jwt_secret)?;

    state.db.users.insert(user.clone())?;

    info!("New user registered: {}", user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /auth/login
/// Body: { "email": "...", "password": "..." }
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let user = state
        .db
        .users
        .find_by_email(&payload.email)
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = verify(&payload.password, &user.hashed_password)
        .map_err(|e| ApiError::InternalError(format!("Password verification failed: {}", e)))?;

    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let token = create_token(&user.id, &user.email, &state.config.jwt_secret)?;

    info!("User logged in: {}", user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /users/me
/// Headers: Authorization: Bearer <token>
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.db.users.get(user.id).ok_or(ApiError::NotFound)?;

    Ok(Json(user.into()))
}

/// DELETE /users/me
/// Removes the account together with every post it authored.
pub async fn delete_current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    let deleted_posts = state.db.delete_user(user.id)?;

    info!("User deleted: {} ({} posts removed)", user.email, deleted_posts);

    Ok(Json(DeleteUserResponse { deleted_posts }))
}
