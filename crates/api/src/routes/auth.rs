//! Authentication routes for register, login and the current user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::info;
use validator::Validate;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use financeflow_core::auth::{hash_password, normalize_email, verify_password};
use financeflow_db::{
    UserRepository,
    entities::{sea_orm_active_enums::UserRole, users},
    repositories::{CreateUserInput, database_error},
};
use financeflow_shared::AppError;
use financeflow_shared::auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Auth routes that need a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// Converts a user row into its public shape.
pub(crate) fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role.into(),
        is_active: user.is_active,
        created_at: user.created_at,
    }
}

fn issue_token(state: &AppState, user: users::Model) -> ApiResult<AuthResponse> {
    let token = state
        .jwt_service
        .generate_token(user.id, &user.email, user.role.into())?;

    Ok(AuthResponse {
        token,
        user: user_info(user),
    })
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;

    let email = normalize_email(&payload.email);
    let user_repo = UserRepository::new((*state.db).clone());
    let password_hash = hash_password(&payload.password)?;

    let user = user_repo
        .create(CreateUserInput {
            email,
            password_hash,
            name: payload.name.trim().to_string(),
            role: UserRole::User,
        })
        .await?;

    info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(issue_token(&state, user)?)))
}

/// POST /auth/login - Authenticate with email and password.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.validate()?;

    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
    let email = normalize_email(&payload.email);
    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo
        .find_by_email(&email)
        .await
        .map_err(database_error)?
    else {
        info!(email = %email, "Login attempt for unknown email");
        return Err(invalid().into());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid().into());
    }

    if !user.is_active {
        info!(user_id = %user.id, "Login attempt on disabled user");
        return Err(AppError::Unauthorized("This user has been disabled".to_string()).into());
    }

    info!(user_id = %user.id, "User logged in");
    Ok(Json(issue_token(&state, user)?))
}

/// GET /auth/me - The authenticated user.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await
        .map_err(database_error)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user_info(user)))
}
