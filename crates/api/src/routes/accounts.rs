//! Account management routes.

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

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use financeflow_core::account::AccountType;
use financeflow_core::balance::{BalancePoint, balance_history};
use financeflow_core::repository::TransactionRepository as _;
use financeflow_db::{
    AccountRepository, DeleteOutcome, TransactionRepository,
    entities::accounts,
    repositories::{
        AccountError, AccountFilter, CreateAccountInput, UpdateAccountInput, database_error,
    },
};
use financeflow_shared::types::from_minor_units;

const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{account_id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/{account_id}/balance-history", get(get_balance_history))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    /// Account name.
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub name: String,
    /// Kind of account.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Opening balance (default: 0).
    pub initial_balance: Option<Decimal>,
    /// Currency code (default: BRL).
    #[validate(length(equal = 3, message = "must be a 3-letter code"))]
    pub currency: Option<String>,
}

/// Request body for updating an account.
///
/// The opening balance is fixed once the account exists.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    /// Account name.
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub name: Option<String>,
    /// Kind of account.
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// Currency code.
    #[validate(length(equal = 3, message = "must be a 3-letter code"))]
    pub currency: Option<String>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Account name.
    pub name: String,
    /// Kind of account.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Current balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Opening balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_balance: Decimal,
    /// Currency code.
    pub currency: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<accounts::Model> for AccountResponse {
    fn from(account: accounts::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            account_type: account.account_type.into(),
            balance: from_minor_units(account.balance_cents),
            initial_balance: from_minor_units(account.initial_balance_cents),
            currency: account.currency,
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Query parameters for balance history.
#[derive(Debug, Deserialize)]
pub struct BalanceHistoryQuery {
    /// Number of days, ending today (default: 30, max: 365).
    pub days: Option<u32>,
}

/// Response for balance history.
#[derive(Debug, Serialize)]
pub struct BalanceHistoryResponse {
    /// Account ID.
    pub account_id: Uuid,
    /// Current balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_balance: Decimal,
    /// One point per day, oldest first.
    pub history: Vec<BalancePoint>,
}

/// GET `/accounts` - List the caller's accounts.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListAccountsQuery>,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let filter = AccountFilter {
        is_active: query.is_active,
        account_type: query.account_type.map(Into::into),
    };

    let accounts = AccountRepository::new((*state.db).clone())
        .list(auth.user_id(), filter)
        .await
        .map_err(database_error)?;

    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    payload.validate()?;

    let input = CreateAccountInput {
        name: payload.name.trim().to_string(),
        account_type: payload.account_type.into(),
        initial_balance: payload.initial_balance.unwrap_or(Decimal::ZERO),
        currency: payload
            .currency
            .map_or_else(|| "BRL".to_string(), |c| c.to_uppercase()),
    };

    let account = AccountRepository::new((*state.db).clone())
        .create(auth.user_id(), input)
        .await?;

    info!(account_id = %account.id, user_id = %auth.user_id(), "Account created");
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET `/accounts/{account_id}` - Get one account.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountRepository::new((*state.db).clone())
        .find_owned(auth.user_id(), account_id)
        .await
        .map_err(database_error)?
        .ok_or(AccountError::NotFound(account_id))?;

    Ok(Json(account.into()))
}

/// PUT `/accounts/{account_id}` - Update an account's descriptive fields.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    payload.validate()?;

    let input = UpdateAccountInput {
        name: payload.name.map(|n| n.trim().to_string()),
        account_type: payload.account_type.map(Into::into),
        currency: payload.currency.map(|c| c.to_uppercase()),
        is_active: payload.is_active,
    };

    let account = AccountRepository::new((*state.db).clone())
        .update(auth.user_id(), account_id, input)
        .await?;

    info!(account_id = %account.id, "Account updated");
    Ok(Json(account.into()))
}

/// DELETE `/accounts/{account_id}` - Delete, or deactivate while transactions
/// reference the account.
///
/// Answers 204 after a hard delete and 200 with the deactivated account
/// otherwise.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Response> {
    let outcome = AccountRepository::new((*state.db).clone())
        .delete(auth.user_id(), account_id)
        .await?;

    Ok(match outcome {
        DeleteOutcome::Deleted => {
            info!(account_id = %account_id, "Account deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        DeleteOutcome::Deactivated(account) => {
            info!(account_id = %account_id, "Account has transactions, deactivated instead");
            Json(AccountResponse::from(account)).into_response()
        }
    })
}

/// GET `/accounts/{account_id}/balance-history` - Daily balances up to today.
async fn get_balance_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Query(query): Query<BalanceHistoryQuery>,
) -> ApiResult<Json<BalanceHistoryResponse>> {
    let account = AccountRepository::new((*state.db).clone())
        .find_owned(auth.user_id(), account_id)
        .await
        .map_err(database_error)?
        .ok_or(AccountError::NotFound(account_id))?;

    let txs = TransactionRepository::new((*state.db).clone())
        .completed_touching_account(account_id)
        .await?;

    let history = balance_history(
        from_minor_units(account.initial_balance_cents),
        &txs,
        account_id,
        Utc::now().date_naive(),
        query.days.unwrap_or(DEFAULT_HISTORY_DAYS),
    );

    Ok(Json(BalanceHistoryResponse {
        account_id,
        current_balance: from_minor_units(account.balance_cents),
        history,
    }))
}
