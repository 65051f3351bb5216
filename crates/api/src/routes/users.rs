//! User management routes (admin only).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::auth::user_info;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use financeflow_core::auth::{hash_password, normalize_email};
use financeflow_core::reports::UserOverview;
use financeflow_db::{
    UserRepository,
    repositories::{CreateUserInput, UpdateUserInput, UserError, database_error},
};
use financeflow_shared::auth::{UserInfo, trimmed, trimmed_option};
use financeflow_shared::types::{PageRequest, PageResponse};
use financeflow_shared::{AppError, UserRole};

/// Creates the user management routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/stats/overview", get(get_overview))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Query parameters for listing users.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Page number (1-indexed, default: 1).
    pub page: Option<u64>,
    /// Items per page (default: 20, max: 100).
    pub limit: Option<u64>,
}

/// Request body for creating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Email.
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// Initial password.
    #[validate(length(min = 6, message = "must have at least 6 characters"))]
    pub password: String,
    /// Display name.
    #[validate(length(min = 1, max = 120, message = "is required"))]
    pub name: String,
    /// Role (default: user).
    pub role: Option<UserRole>,
}

/// Request body for updating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// Email.
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    /// New password.
    #[validate(length(min = 6, message = "must have at least 6 characters"))]
    pub password: Option<String>,
    /// Display name.
    #[validate(length(min = 1, max = 120, message = "must not be empty"))]
    pub name: Option<String>,
    /// Role.
    pub role: Option<UserRole>,
    /// Whether the user may log in.
    pub is_active: Option<bool>,
}

/// GET `/users` - List every user.
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<PageResponse<UserInfo>>> {
    auth.require_admin()?;

    let page = PageRequest::from_query(query.page, query.limit);
    let (users, total) = UserRepository::new((*state.db).clone())
        .list(&page)
        .await
        .map_err(database_error)?;

    let data = users.into_iter().map(user_info).collect();
    Ok(Json(PageResponse::new(data, page.page, page.limit, total)))
}

/// POST `/users` - Create a user with any role.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserInfo>)> {
    auth.require_admin()?;
    payload.validate()?;

    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            email: normalize_email(&payload.email),
            password_hash: hash_password(&payload.password)?,
            name: payload.name.trim().to_string(),
            role: payload.role.unwrap_or(UserRole::User).into(),
        })
        .await?;

    info!(user_id = %user.id, admin_id = %auth.user_id(), "User created by admin");
    Ok((StatusCode::CREATED, Json(user_info(user))))
}

/// GET `/users/{user_id}` - Get one user.
async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserInfo>> {
    auth.require_admin()?;

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(user_id)
        .await
        .map_err(database_error)?
        .ok_or(UserError::NotFound(user_id))?;

    Ok(Json(user_info(user)))
}

/// PUT `/users/{user_id}` - Update a user.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserInfo>> {
    auth.require_admin()?;
    payload.validate()?;

    let password_hash = payload
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    let input = UpdateUserInput {
        email: payload.email.as_deref().map(normalize_email),
        password_hash,
        name: payload.name.map(|n| n.trim().to_string()),
        role: payload.role.map(Into::into),
        is_active: payload.is_active,
    };

    let user = UserRepository::new((*state.db).clone())
        .update(user_id, input)
        .await?;

    info!(user_id = %user.id, admin_id = %auth.user_id(), "User updated by admin");
    Ok(Json(user_info(user)))
}

/// DELETE `/users/{user_id}` - Delete a user and everything they own.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_admin()?;

    if user_id == auth.user_id() {
        return Err(AppError::Validation("admins cannot delete themselves".to_string()).into());
    }

    UserRepository::new((*state.db).clone())
        .delete(user_id)
        .await?;

    info!(user_id = %user_id, admin_id = %auth.user_id(), "User deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/users/stats/overview` - Head counts across all users.
async fn get_overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserOverview>> {
    auth.require_admin()?;

    let overview = UserRepository::new((*state.db).clone())
        .overview()
        .await
        .map_err(database_error)?;

    Ok(Json(overview))
}
