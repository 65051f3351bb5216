//! Transaction routes.
//!
//! Every write is followed by a balance recompute of each account the old and
//! new versions of the transaction reference.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use financeflow_core::balance::{BalanceRecalculator, touched_accounts};
use financeflow_core::category::CategoryKind;
use financeflow_core::export::{ExportRow, write_csv};
use financeflow_core::forecast::{DEFAULT_FORECAST_MONTHS, ForecastMonth, forecast};
use financeflow_core::reports::{PeriodSummary, ReportPeriod, summarize};
use financeflow_core::transaction::{
    FixedFrequency, TransactionDraft, TransactionKind, TransactionRecord, TransactionStatus,
    validate_draft,
};
use financeflow_db::{
    AccountRepository, CategoryRepository, TransactionRepository,
    entities::transactions,
    repositories::{
        AccountError, AccountFilter, CategoryError, CategoryFilter, TransactionError,
        TransactionFilter, TransactionInput, TransactionSort, database_error, to_records,
    },
};
use financeflow_shared::AppError;
use financeflow_shared::types::{PageRequest, PageResponse, from_minor_units};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/stats/summary", get(get_summary))
        .route("/transactions/export", get(export_transactions))
        .route("/transactions/forecast", get(get_forecast))
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

/// Query parameters for listing and exporting transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// Page number (1-indexed, default: 1).
    pub page: Option<u64>,
    /// Items per page (default: 20, max: 100).
    pub limit: Option<u64>,
    /// Ordering (default: `date_desc`).
    pub sort: Option<TransactionSort>,
    /// Source or destination account.
    pub account_id: Option<Uuid>,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionKind>,
    /// Lifecycle state.
    pub status: Option<TransactionStatus>,
    /// First day, inclusive.
    pub start_date: Option<NaiveDate>,
    /// Last day, inclusive.
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive match on the description.
    pub search: Option<String>,
}

impl ListTransactionsQuery {
    fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            account_id: self.account_id,
            category_id: self.category_id,
            transaction_type: self.transaction_type.map(Into::into),
            status: self.status.map(Into::into),
            start_date: self.start_date,
            end_date: self.end_date,
            search: self.search.clone(),
        }
    }
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    /// Description.
    #[validate(length(min = 1, max = 255, message = "is required"))]
    pub description: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionKind,
    /// Lifecycle state (default: completed).
    pub status: Option<TransactionStatus>,
    /// Booking date (default: today).
    pub date: Option<NaiveDate>,
    /// Source account.
    pub account_id: Uuid,
    /// Destination account, transfers only.
    pub to_account_id: Option<Uuid>,
    /// Category, required unless transfer.
    pub category_id: Option<Uuid>,
    /// Whether the transaction recurs (default: false).
    #[serde(default)]
    pub is_fixed: bool,
    /// Recurrence, required when fixed.
    pub fixed_frequency: Option<FixedFrequency>,
    /// Free-form notes.
    #[validate(length(max = 1000, message = "is too long"))]
    pub notes: Option<String>,
}

/// Request body for updating a transaction. Missing fields keep their value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTransactionRequest {
    /// Description.
    #[validate(length(min = 1, max = 255, message = "must not be empty"))]
    pub description: Option<String>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionKind>,
    /// Lifecycle state.
    pub status: Option<TransactionStatus>,
    /// Booking date.
    pub date: Option<NaiveDate>,
    /// Source account.
    pub account_id: Option<Uuid>,
    /// Destination account.
    pub to_account_id: Option<Uuid>,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Whether the transaction recurs.
    pub is_fixed: Option<bool>,
    /// Recurrence.
    pub fixed_frequency: Option<FixedFrequency>,
    /// Free-form notes.
    #[validate(length(max = 1000, message = "is too long"))]
    pub notes: Option<String>,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Description.
    pub description: String,
    /// Positive amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionKind,
    /// Lifecycle state.
    pub status: TransactionStatus,
    /// Booking date.
    pub date: NaiveDate,
    /// Source account.
    pub account_id: Uuid,
    /// Destination account.
    pub to_account_id: Option<Uuid>,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Whether the transaction recurs.
    pub is_fixed: bool,
    /// Recurrence.
    pub fixed_frequency: Option<FixedFrequency>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(tx: transactions::Model) -> Self {
        Self {
            id: tx.id,
            description: tx.description,
            amount: from_minor_units(tx.amount_cents),
            transaction_type: tx.transaction_type.into(),
            status: tx.status.into(),
            date: tx.date,
            account_id: tx.account_id,
            to_account_id: tx.to_account_id,
            category_id: tx.category_id,
            is_fixed: tx.is_fixed,
            fixed_frequency: tx.fixed_frequency.map(Into::into),
            notes: tx.notes,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

/// Query parameters for the period summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Window (default: month).
    pub period: Option<ReportPeriod>,
}

/// Query parameters for the forecast.
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Months to project (default: 6, max: 24).
    pub months: Option<u32>,
}

/// Response for the forecast.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    /// First day projected.
    pub from: NaiveDate,
    /// One entry per calendar month.
    pub months: Vec<ForecastMonth>,
}

/// The writable fields of a transaction after merging, before checks.
struct TransactionFields {
    description: String,
    amount: Decimal,
    kind: TransactionKind,
    status: TransactionStatus,
    date: NaiveDate,
    account_id: Uuid,
    to_account_id: Option<Uuid>,
    category_id: Option<Uuid>,
    is_fixed: bool,
    fixed_frequency: Option<FixedFrequency>,
    notes: Option<String>,
}

/// Validates the shape of a transaction and that every referenced account
/// and category belongs to the user.
async fn checked_input(
    state: &AppState,
    user_id: Uuid,
    fields: TransactionFields,
) -> ApiResult<TransactionInput> {
    let draft = TransactionDraft {
        kind: fields.kind,
        amount: fields.amount,
        account_id: fields.account_id,
        to_account_id: fields.to_account_id,
        category_id: fields.category_id,
        is_fixed: fields.is_fixed,
        fixed_frequency: fields.fixed_frequency,
    }
    .normalized();
    validate_draft(&draft)?;

    let account_repo = AccountRepository::new((*state.db).clone());
    for account_id in std::iter::once(draft.account_id).chain(draft.to_account_id) {
        account_repo
            .find_owned(user_id, account_id)
            .await
            .map_err(database_error)?
            .ok_or(AccountError::NotFound(account_id))?;
    }

    if let Some(category_id) = draft.category_id {
        let category = CategoryRepository::new((*state.db).clone())
            .find_owned(user_id, category_id)
            .await
            .map_err(database_error)?
            .ok_or(CategoryError::NotFound(category_id))?;

        let kind = CategoryKind::from(category.category_type);
        if !kind.accepts(draft.kind) {
            return Err(AppError::Validation(format!(
                "a {} transaction cannot use the {} category '{}'",
                draft.kind, kind, category.name
            ))
            .into());
        }
    }

    Ok(TransactionInput {
        description: fields.description.trim().to_string(),
        amount: draft.amount,
        transaction_type: draft.kind.into(),
        status: fields.status.into(),
        date: fields.date,
        account_id: draft.account_id,
        to_account_id: draft.to_account_id,
        category_id: draft.category_id,
        is_fixed: draft.is_fixed,
        fixed_frequency: draft.fixed_frequency.map(Into::into),
        notes: fields.notes,
    })
}

/// Recomputes every account referenced by either version of a transaction.
async fn refresh_balances(
    state: &AppState,
    before: Option<&transactions::Model>,
    after: Option<&transactions::Model>,
) -> ApiResult<()> {
    let before = before.map(TransactionRecord::from);
    let after = after.map(TransactionRecord::from);
    let touched = touched_accounts(before.as_ref(), after.as_ref());
    debug!(accounts = touched.len(), "Refreshing balances");

    let accounts = AccountRepository::new((*state.db).clone());
    let transactions = TransactionRepository::new((*state.db).clone());
    BalanceRecalculator::new(&accounts, &transactions)
        .recompute_all(touched)
        .await?;
    Ok(())
}

/// GET `/transactions` - List the caller's transactions, one page at a time.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<Json<PageResponse<TransactionResponse>>> {
    let page = PageRequest::from_query(query.page, query.limit);
    let (rows, total) = TransactionRepository::new((*state.db).clone())
        .list(
            auth.user_id(),
            &query.filter(),
            query.sort.unwrap_or_default(),
            &page,
        )
        .await
        .map_err(database_error)?;

    let data = rows.into_iter().map(TransactionResponse::from).collect();
    Ok(Json(PageResponse::new(data, page.page, page.limit, total)))
}

/// POST `/transactions` - Create a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    payload.validate()?;

    let fields = TransactionFields {
        description: payload.description,
        amount: payload.amount,
        kind: payload.transaction_type,
        status: payload.status.unwrap_or(TransactionStatus::Completed),
        date: payload.date.unwrap_or_else(|| Utc::now().date_naive()),
        account_id: payload.account_id,
        to_account_id: payload.to_account_id,
        category_id: payload.category_id,
        is_fixed: payload.is_fixed,
        fixed_frequency: payload.fixed_frequency,
        notes: payload.notes,
    };
    let input = checked_input(&state, auth.user_id(), fields).await?;

    let transaction = TransactionRepository::new((*state.db).clone())
        .create(auth.user_id(), input)
        .await?;
    refresh_balances(&state, None, Some(&transaction)).await?;

    info!(transaction_id = %transaction.id, user_id = %auth.user_id(), "Transaction created");
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// GET `/transactions/{transaction_id}` - Get one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> ApiResult<Json<TransactionResponse>> {
    let transaction = TransactionRepository::new((*state.db).clone())
        .find_owned(auth.user_id(), transaction_id)
        .await
        .map_err(database_error)?
        .ok_or(TransactionError::NotFound(transaction_id))?;

    Ok(Json(transaction.into()))
}

/// PUT `/transactions/{transaction_id}` - Update a transaction.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> ApiResult<Json<TransactionResponse>> {
    payload.validate()?;

    let repo = TransactionRepository::new((*state.db).clone());
    let current = repo
        .find_owned(auth.user_id(), transaction_id)
        .await
        .map_err(database_error)?
        .ok_or(TransactionError::NotFound(transaction_id))?;

    let fields = TransactionFields {
        description: payload.description.unwrap_or(current.description),
        amount: payload
            .amount
            .unwrap_or_else(|| from_minor_units(current.amount_cents)),
        kind: payload
            .transaction_type
            .unwrap_or_else(|| current.transaction_type.into()),
        status: payload.status.unwrap_or_else(|| current.status.into()),
        date: payload.date.unwrap_or(current.date),
        account_id: payload.account_id.unwrap_or(current.account_id),
        to_account_id: payload.to_account_id.or(current.to_account_id),
        category_id: payload.category_id.or(current.category_id),
        is_fixed: payload.is_fixed.unwrap_or(current.is_fixed),
        fixed_frequency: payload
            .fixed_frequency
            .or_else(|| current.fixed_frequency.map(Into::into)),
        notes: payload.notes.or(current.notes),
    };
    let input = checked_input(&state, auth.user_id(), fields).await?;

    let (before, after) = repo.update(auth.user_id(), transaction_id, input).await?;
    refresh_balances(&state, Some(&before), Some(&after)).await?;

    info!(transaction_id = %after.id, "Transaction updated");
    Ok(Json(after.into()))
}

/// DELETE `/transactions/{transaction_id}` - Delete a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = TransactionRepository::new((*state.db).clone())
        .delete(auth.user_id(), transaction_id)
        .await?;
    refresh_balances(&state, Some(&removed), None).await?;

    info!(transaction_id = %transaction_id, "Transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/transactions/stats/summary` - Totals of completed transactions in a period.
async fn get_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<PeriodSummary>> {
    let window = query
        .period
        .unwrap_or_default()
        .window(Utc::now().date_naive());

    let rows = TransactionRepository::new((*state.db).clone())
        .completed_between(auth.user_id(), window.start, window.end)
        .await
        .map_err(database_error)?;

    Ok(Json(summarize(&to_records(&rows), window)))
}

/// GET `/transactions/export` - Matching transactions as a CSV file.
async fn export_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id();
    let rows = TransactionRepository::new((*state.db).clone())
        .list_all(user_id, &query.filter(), query.sort.unwrap_or_default())
        .await
        .map_err(database_error)?;

    let account_names: HashMap<Uuid, String> = AccountRepository::new((*state.db).clone())
        .list(user_id, AccountFilter::default())
        .await
        .map_err(database_error)?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let category_names: HashMap<Uuid, String> = CategoryRepository::new((*state.db).clone())
        .list(user_id, CategoryFilter::default())
        .await
        .map_err(database_error)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let export_rows: Vec<ExportRow> = rows
        .into_iter()
        .map(|tx| ExportRow {
            date: tx.date,
            account_name: account_names
                .get(&tx.account_id)
                .cloned()
                .unwrap_or_default(),
            category_name: tx.category_id.and_then(|id| category_names.get(&id).cloned()),
            description: tx.description,
            kind: tx.transaction_type.into(),
            amount: from_minor_units(tx.amount_cents),
            status: tx.status.into(),
        })
        .collect();

    let body = write_csv(&export_rows)?;
    info!(user_id = %user_id, rows = export_rows.len(), "Transactions exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transacoes.csv\"",
            ),
        ],
        body,
    ))
}

/// GET `/transactions/forecast` - Projected cash flow of fixed transactions.
async fn get_forecast(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Json<ForecastResponse>> {
    let rows = TransactionRepository::new((*state.db).clone())
        .fixed(auth.user_id())
        .await
        .map_err(database_error)?;

    let from = Utc::now().date_naive();
    let months = forecast(
        &to_records(&rows),
        from,
        query.months.unwrap_or(DEFAULT_FORECAST_MONTHS),
    );

    Ok(Json(ForecastResponse { from, months }))
}
