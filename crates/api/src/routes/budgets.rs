//! Budget routes.
//!
//! `spent` is recomputed from transactions before any budget is returned.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use financeflow_core::budget::{
    BudgetMetrics, BudgetOverview, BudgetPeriod, BudgetSpentAggregator, DEFAULT_ALERT_THRESHOLD,
    DailySpending, spending_by_day, validate_budget,
};
use financeflow_core::category::CategoryKind;
use financeflow_core::repository::{BudgetScope, TransactionRepository as _};
use financeflow_db::{
    BudgetRepository, CategoryRepository, TransactionRepository,
    entities::budgets,
    repositories::{
        BudgetError, BudgetFilter, CategoryError, CreateBudgetInput, UpdateBudgetInput,
        database_error,
    },
};
use financeflow_shared::AppError;
use financeflow_shared::types::from_minor_units;

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/stats/overview", get(get_overview))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{budget_id}/performance", get(get_performance))
}

/// Query parameters for listing budgets.
#[derive(Debug, Deserialize)]
pub struct ListBudgetsQuery {
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Filter by cadence.
    pub period: Option<BudgetPeriod>,
}

/// Request body for creating a budget.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBudgetRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub name: String,
    /// Planned amount.
    pub amount: Decimal,
    /// Cadence.
    pub period: BudgetPeriod,
    /// First day counted.
    pub start_date: NaiveDate,
    /// Last day counted (default: derived from the period).
    pub end_date: Option<NaiveDate>,
    /// Tracked expense category.
    pub category_id: Uuid,
    /// Near-limit threshold in percent (default: 80).
    pub alert_threshold: Option<i32>,
}

/// Request body for updating a budget. Missing fields keep their value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBudgetRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub name: Option<String>,
    /// Planned amount.
    pub amount: Option<Decimal>,
    /// Cadence.
    pub period: Option<BudgetPeriod>,
    /// First day counted.
    pub start_date: Option<NaiveDate>,
    /// Last day counted.
    pub end_date: Option<NaiveDate>,
    /// Tracked expense category.
    pub category_id: Option<Uuid>,
    /// Near-limit threshold in percent.
    pub alert_threshold: Option<i32>,
    /// Whether the budget is active.
    pub is_active: Option<bool>,
}

/// Response for a budget, with its metrics as of today.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    /// Budget ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Planned amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Completed expenses in the window.
    #[serde(with = "rust_decimal::serde::float")]
    pub spent: Decimal,
    /// Cadence.
    pub period: BudgetPeriod,
    /// First day counted.
    pub start_date: NaiveDate,
    /// Last day counted.
    pub end_date: NaiveDate,
    /// Tracked category.
    pub category_id: Uuid,
    /// Near-limit threshold in percent.
    pub alert_threshold: i32,
    /// Whether the budget is active.
    pub is_active: bool,
    /// Derived values.
    #[serde(flatten)]
    pub metrics: BudgetMetrics,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BudgetResponse {
    fn new(budget: budgets::Model, today: NaiveDate) -> Self {
        let amount = from_minor_units(budget.amount_cents);
        let spent = from_minor_units(budget.spent_cents);
        let metrics = BudgetMetrics::compute(
            amount,
            spent,
            budget.start_date,
            budget.end_date,
            budget.alert_threshold,
            today,
        );

        Self {
            id: budget.id,
            name: budget.name,
            amount,
            spent,
            period: budget.period.into(),
            start_date: budget.start_date,
            end_date: budget.end_date,
            category_id: budget.category_id,
            alert_threshold: budget.alert_threshold,
            is_active: budget.is_active,
            metrics,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        }
    }
}

/// Response for a budget's performance.
#[derive(Debug, Serialize)]
pub struct BudgetPerformanceResponse {
    /// The budget and its metrics.
    pub budget: BudgetResponse,
    /// Spending per day within the window.
    pub daily_spending: Vec<DailySpending>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Recomputes the spent figure of every listed budget.
async fn refresh_spent<I>(state: &AppState, budget_ids: I) -> ApiResult<()>
where
    I: IntoIterator<Item = Uuid>,
{
    let budgets = BudgetRepository::new((*state.db).clone());
    let transactions = TransactionRepository::new((*state.db).clone());
    BudgetSpentAggregator::new(&budgets, &transactions)
        .recompute_all(budget_ids)
        .await?;
    Ok(())
}

/// Recomputes one budget and reads it back.
async fn load_fresh(state: &AppState, user_id: Uuid, budget_id: Uuid) -> ApiResult<budgets::Model> {
    let repo = BudgetRepository::new((*state.db).clone());
    let budget = repo
        .find_owned(user_id, budget_id)
        .await
        .map_err(database_error)?
        .ok_or(BudgetError::NotFound(budget_id))?;

    refresh_spent(state, [budget.id]).await?;

    Ok(repo
        .find_owned(user_id, budget_id)
        .await
        .map_err(database_error)?
        .ok_or(BudgetError::NotFound(budget_id))?)
}

/// Lists budgets matching `filter` with freshly recomputed spent figures.
async fn list_fresh(
    state: &AppState,
    user_id: Uuid,
    filter: BudgetFilter,
) -> ApiResult<Vec<budgets::Model>> {
    let repo = BudgetRepository::new((*state.db).clone());
    let stale = repo
        .list(user_id, filter.clone())
        .await
        .map_err(database_error)?;
    let ids: Vec<Uuid> = stale.iter().map(|b| b.id).collect();
    refresh_spent(state, ids).await?;

    Ok(repo.list(user_id, filter).await.map_err(database_error)?)
}

/// Checks that a budget tracks one of the user's expense categories.
async fn check_category(state: &AppState, user_id: Uuid, category_id: Uuid) -> ApiResult<()> {
    let category = CategoryRepository::new((*state.db).clone())
        .find_owned(user_id, category_id)
        .await
        .map_err(database_error)?
        .ok_or(CategoryError::NotFound(category_id))?;

    if CategoryKind::from(category.category_type) != CategoryKind::Expense {
        return Err(AppError::Validation(format!(
            "budgets can only track expense categories, '{}' is an income category",
            category.name
        ))
        .into());
    }
    Ok(())
}

/// GET `/budgets` - List the caller's budgets.
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListBudgetsQuery>,
) -> ApiResult<Json<Vec<BudgetResponse>>> {
    let filter = BudgetFilter {
        is_active: query.is_active,
        category_id: query.category_id,
        period: query.period.map(Into::into),
    };

    let today = today();
    let budgets = list_fresh(&state, auth.user_id(), filter).await?;
    Ok(Json(
        budgets
            .into_iter()
            .map(|b| BudgetResponse::new(b, today))
            .collect(),
    ))
}

/// POST `/budgets` - Create a budget.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBudgetRequest>,
) -> ApiResult<(StatusCode, Json<BudgetResponse>)> {
    payload.validate()?;

    let end_date = match payload.end_date {
        Some(end) => end,
        None => payload.period.default_end(payload.start_date).ok_or_else(|| {
            AppError::Validation("start_date is out of range".to_string())
        })?,
    };
    let alert_threshold = payload.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);
    validate_budget(payload.amount, payload.start_date, end_date, alert_threshold)?;
    check_category(&state, auth.user_id(), payload.category_id).await?;

    let input = CreateBudgetInput {
        name: payload.name.trim().to_string(),
        amount: payload.amount,
        period: payload.period.into(),
        start_date: payload.start_date,
        end_date,
        category_id: payload.category_id,
        alert_threshold,
    };

    let created = BudgetRepository::new((*state.db).clone())
        .create(auth.user_id(), input)
        .await?;
    let budget = load_fresh(&state, auth.user_id(), created.id).await?;

    info!(budget_id = %budget.id, user_id = %auth.user_id(), "Budget created");
    Ok((StatusCode::CREATED, Json(BudgetResponse::new(budget, today()))))
}

/// GET `/budgets/{budget_id}` - Get one budget.
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<Json<BudgetResponse>> {
    let budget = load_fresh(&state, auth.user_id(), budget_id).await?;
    Ok(Json(BudgetResponse::new(budget, today())))
}

/// PUT `/budgets/{budget_id}` - Update a budget.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> ApiResult<Json<BudgetResponse>> {
    payload.validate()?;

    let repo = BudgetRepository::new((*state.db).clone());
    let current = repo
        .find_owned(auth.user_id(), budget_id)
        .await
        .map_err(database_error)?
        .ok_or(BudgetError::NotFound(budget_id))?;

    let amount = payload
        .amount
        .unwrap_or_else(|| from_minor_units(current.amount_cents));
    let start_date = payload.start_date.unwrap_or(current.start_date);
    let end_date = payload.end_date.unwrap_or(current.end_date);
    let alert_threshold = payload.alert_threshold.unwrap_or(current.alert_threshold);
    validate_budget(amount, start_date, end_date, alert_threshold)?;

    if let Some(category_id) = payload.category_id
        && category_id != current.category_id
    {
        check_category(&state, auth.user_id(), category_id).await?;
    }

    let input = UpdateBudgetInput {
        name: payload.name.map(|n| n.trim().to_string()),
        amount: payload.amount,
        period: payload.period.map(Into::into),
        start_date: payload.start_date,
        end_date: payload.end_date,
        category_id: payload.category_id,
        alert_threshold: payload.alert_threshold,
        is_active: payload.is_active,
    };
    repo.update(auth.user_id(), budget_id, input).await?;
    let budget = load_fresh(&state, auth.user_id(), budget_id).await?;

    info!(budget_id = %budget_id, "Budget updated");
    Ok(Json(BudgetResponse::new(budget, today())))
}

/// DELETE `/budgets/{budget_id}` - Delete a budget.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    BudgetRepository::new((*state.db).clone())
        .delete(auth.user_id(), budget_id)
        .await?;

    info!(budget_id = %budget_id, "Budget deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/budgets/{budget_id}/performance` - Metrics and day-by-day spending.
async fn get_performance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<Json<BudgetPerformanceResponse>> {
    let budget = load_fresh(&state, auth.user_id(), budget_id).await?;

    let scope = BudgetScope {
        budget_id: budget.id,
        user_id: budget.user_id,
        category_id: budget.category_id,
        start_date: budget.start_date,
        end_date: budget.end_date,
    };
    let txs = TransactionRepository::new((*state.db).clone())
        .completed_expenses_in_window(
            scope.user_id,
            scope.category_id,
            scope.start_date,
            scope.end_date,
        )
        .await?;

    Ok(Json(BudgetPerformanceResponse {
        budget: BudgetResponse::new(budget, today()),
        daily_spending: spending_by_day(&scope, &txs),
    }))
}

/// GET `/budgets/stats/overview` - Totals over the caller's active budgets.
async fn get_overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<BudgetOverview>> {
    let filter = BudgetFilter {
        is_active: Some(true),
        ..BudgetFilter::default()
    };
    let budgets = list_fresh(&state, auth.user_id(), filter).await?;

    Ok(Json(BudgetOverview::from_budgets(budgets.iter().map(|b| {
        (
            from_minor_units(b.amount_cents),
            from_minor_units(b.spent_cents),
            b.alert_threshold,
        )
    }))))
}
