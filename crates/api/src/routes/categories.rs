//! Category routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::double_option;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use financeflow_core::category::CategoryKind;
use financeflow_core::reports::{
    CategoryShare, CategoryStats, ReportPeriod, category_overview, category_stats,
};
use financeflow_db::{
    CategoryRepository, DeleteOutcome, TransactionRepository,
    entities::categories,
    repositories::{
        CategoryError, CategoryFilter, CreateCategoryInput, UpdateCategoryInput, database_error,
        to_records,
    },
};
use financeflow_shared::AppError;
use financeflow_shared::types::from_minor_units;

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/stats/overview", get(get_overview))
        .route(
            "/categories/{category_id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/categories/{category_id}/stats", get(get_category_stats))
}

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Filter by type.
    #[serde(rename = "type")]
    pub category_type: Option<CategoryKind>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Request body for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub category_type: CategoryKind,
    /// Optional soft cap.
    pub budget: Option<Decimal>,
    /// Display color.
    #[validate(length(max = 20, message = "is too long"))]
    pub color: Option<String>,
    /// Display icon.
    #[validate(length(max = 50, message = "is too long"))]
    pub icon: Option<String>,
}

/// Request body for updating a category.
///
/// `null` clears `budget`, `color` and `icon`; a missing field keeps them.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub name: Option<String>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub category_type: Option<CategoryKind>,
    /// Soft cap.
    #[serde(default, deserialize_with = "double_option")]
    pub budget: Option<Option<Decimal>>,
    /// Display color.
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
    /// Display icon.
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
    /// Whether the category is active.
    pub is_active: Option<bool>,
}

/// Response for a category.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub category_type: CategoryKind,
    /// Optional soft cap.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub budget: Option<Decimal>,
    /// Display color.
    pub color: Option<String>,
    /// Display icon.
    pub icon: Option<String>,
    /// Whether the category is active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<categories::Model> for CategoryResponse {
    fn from(category: categories::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
            category_type: category.category_type.into(),
            budget: category.budget_cents.map(from_minor_units),
            color: category.color,
            icon: category.icon,
            is_active: category.is_active,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// Query parameters for the per-category statistics.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Window (default: month).
    pub period: Option<ReportPeriod>,
}

/// Query parameters for the category overview.
#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    /// Window (default: month).
    pub period: Option<ReportPeriod>,
    /// Restrict to one type.
    #[serde(rename = "type")]
    pub category_type: Option<CategoryKind>,
}

fn check_budget(budget: Option<Decimal>) -> ApiResult<()> {
    if budget.is_some_and(|b| b < Decimal::ZERO) {
        return Err(AppError::Validation("budget must not be negative".to_string()).into());
    }
    Ok(())
}

/// GET `/categories` - List the caller's categories.
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListCategoriesQuery>,
) -> ApiResult<Json<Vec<CategoryResponse>>> {
    let filter = CategoryFilter {
        category_type: query.category_type.map(Into::into),
        is_active: query.is_active,
    };

    let categories = CategoryRepository::new((*state.db).clone())
        .list(auth.user_id(), filter)
        .await
        .map_err(database_error)?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    payload.validate()?;
    check_budget(payload.budget)?;

    let input = CreateCategoryInput {
        name: payload.name,
        category_type: payload.category_type.into(),
        budget: payload.budget,
        color: payload.color,
        icon: payload.icon,
    };

    let category = CategoryRepository::new((*state.db).clone())
        .create(auth.user_id(), input)
        .await?;

    info!(category_id = %category.id, user_id = %auth.user_id(), "Category created");
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// GET `/categories/{category_id}` - Get one category.
async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
) -> ApiResult<Json<CategoryResponse>> {
    let category = CategoryRepository::new((*state.db).clone())
        .find_owned(auth.user_id(), category_id)
        .await
        .map_err(database_error)?
        .ok_or(CategoryError::NotFound(category_id))?;

    Ok(Json(category.into()))
}

/// PUT `/categories/{category_id}` - Update a category.
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    payload.validate()?;
    check_budget(payload.budget.flatten())?;

    let input = UpdateCategoryInput {
        name: payload.name,
        category_type: payload.category_type.map(Into::into),
        budget: payload.budget,
        color: payload.color,
        icon: payload.icon,
        is_active: payload.is_active,
    };

    let category = CategoryRepository::new((*state.db).clone())
        .update(auth.user_id(), category_id, input)
        .await?;

    info!(category_id = %category.id, "Category updated");
    Ok(Json(category.into()))
}

/// DELETE `/categories/{category_id}` - Delete, or deactivate while
/// transactions or budgets reference the category.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
) -> ApiResult<Response> {
    let outcome = CategoryRepository::new((*state.db).clone())
        .delete(auth.user_id(), category_id)
        .await?;

    Ok(match outcome {
        DeleteOutcome::Deleted => {
            info!(category_id = %category_id, "Category deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        DeleteOutcome::Deactivated(category) => {
            info!(category_id = %category_id, "Category in use, deactivated instead");
            Json(CategoryResponse::from(category)).into_response()
        }
    })
}

/// GET `/categories/{category_id}/stats` - Activity of one category in a period.
async fn get_category_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<CategoryStats>> {
    CategoryRepository::new((*state.db).clone())
        .find_owned(auth.user_id(), category_id)
        .await
        .map_err(database_error)?
        .ok_or(CategoryError::NotFound(category_id))?;

    let window = query
        .period
        .unwrap_or_default()
        .window(Utc::now().date_naive());
    let rows = TransactionRepository::new((*state.db).clone())
        .completed_between(auth.user_id(), window.start, window.end)
        .await
        .map_err(database_error)?;

    Ok(Json(category_stats(&to_records(&rows), category_id, window)))
}

/// GET `/categories/stats/overview` - Totals and shares of every category in a period.
async fn get_overview(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OverviewQuery>,
) -> ApiResult<Json<Vec<CategoryShare>>> {
    let filter = CategoryFilter {
        category_type: query.category_type.map(Into::into),
        is_active: None,
    };
    let categories: Vec<(Uuid, String, CategoryKind)> = CategoryRepository::new((*state.db).clone())
        .list(auth.user_id(), filter)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(|c| (c.id, c.name, c.category_type.into()))
        .collect();

    let window = query
        .period
        .unwrap_or_default()
        .window(Utc::now().date_naive());
    let rows = TransactionRepository::new((*state.db).clone())
        .completed_between(auth.user_id(), window.start, window.end)
        .await
        .map_err(database_error)?;

    Ok(Json(category_overview(&categories, &to_records(&rows), window)))
}
