//! Transaction repository.
//!
//! Writes here never touch derived balances; callers recompute the accounts
//! returned by [`financeflow_core::balance::touched_accounts`] afterwards.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use financeflow_core::repository as ports;
use financeflow_core::transaction::TransactionRecord;
use financeflow_shared::types::{MoneyError, PageRequest, from_minor_units, to_minor_units};
use financeflow_shared::{AppError, AppResult};

use super::database_error;
use crate::entities::{
    sea_orm_active_enums::{FixedFrequency, TransactionStatus, TransactionType},
    transactions,
};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found, or owned by someone else.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Amount cannot be stored.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(_) => Self::NotFound("Transaction not found".to_string()),
            TransactionError::Money(e) => e.into(),
            TransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Every writable field of a transaction, already validated.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    /// Description.
    pub description: String,
    /// Positive magnitude.
    pub amount: Decimal,
    /// Direction.
    pub transaction_type: TransactionType,
    /// Lifecycle state.
    pub status: TransactionStatus,
    /// Booking date.
    pub date: NaiveDate,
    /// Source account.
    pub account_id: Uuid,
    /// Destination account, transfers only.
    pub to_account_id: Option<Uuid>,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Whether the transaction recurs.
    pub is_fixed: bool,
    /// Recurrence.
    pub fixed_frequency: Option<FixedFrequency>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Source or destination account.
    pub account_id: Option<Uuid>,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Direction.
    pub transaction_type: Option<TransactionType>,
    /// Lifecycle state.
    pub status: Option<TransactionStatus>,
    /// Earliest date, inclusive.
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive.
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
}

/// Ordering of transaction lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSort {
    /// Newest first.
    #[default]
    DateDesc,
    /// Oldest first.
    DateAsc,
    /// Largest first.
    AmountDesc,
    /// Smallest first.
    AmountAsc,
}

impl From<&transactions::Model> for TransactionRecord {
    fn from(model: &transactions::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            account_id: model.account_id,
            to_account_id: model.to_account_id,
            category_id: model.category_id,
            kind: model.transaction_type.into(),
            status: model.status.into(),
            amount: from_minor_units(model.amount_cents),
            date: model.date,
            description: model.description.clone(),
            is_fixed: model.is_fixed,
            fixed_frequency: model.fixed_frequency.map(Into::into),
        }
    }
}

/// Converts rows to domain records.
#[must_use]
pub fn to_records(models: &[transactions::Model]) -> Vec<TransactionRecord> {
    models.iter().map(TransactionRecord::from).collect()
}

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(
        user_id: Uuid,
        filter: &TransactionFilter,
        sort: TransactionSort,
    ) -> Select<transactions::Entity> {
        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));

        if let Some(account_id) = filter.account_id {
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::AccountId.eq(account_id))
                    .add(transactions::Column::ToAccountId.eq(account_id)),
            );
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(transaction_type) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(transaction_type));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(transactions::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(transactions::Column::Date.lte(end));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(transactions::Column::Description)))
                    .like(format!("%{}%", search.to_lowercase())),
            );
        }

        match sort {
            TransactionSort::DateDesc => query
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::CreatedAt),
            TransactionSort::DateAsc => query
                .order_by_asc(transactions::Column::Date)
                .order_by_asc(transactions::Column::CreatedAt),
            TransactionSort::AmountDesc => query
                .order_by_desc(transactions::Column::AmountCents)
                .order_by_desc(transactions::Column::Date),
            TransactionSort::AmountAsc => query
                .order_by_asc(transactions::Column::AmountCents)
                .order_by_desc(transactions::Column::Date),
        }
    }

    /// Creates a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Money` if the amount has sub-cent precision.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: TransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let now = Utc::now();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_id: Set(input.account_id),
            to_account_id: Set(input.to_account_id),
            category_id: Set(input.category_id),
            description: Set(input.description),
            amount_cents: Set(to_minor_units(input.amount)?),
            transaction_type: Set(input.transaction_type),
            status: Set(input.status),
            date: Set(input.date),
            is_fixed: Set(input.is_fixed),
            fixed_frequency: Set(input.fixed_frequency),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(transaction.insert(&self.db).await?)
    }

    /// Finds a transaction owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Lists one page of a user's transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
        sort: TransactionSort,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), DbErr> {
        let paginator = Self::filtered(user_id, filter, sort).paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.index()).await?;
        Ok((rows, total))
    }

    /// Lists every matching transaction, for export.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
        sort: TransactionSort,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        Self::filtered(user_id, filter, sort).all(&self.db).await
    }

    /// Completed transactions of a user dated within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn completed_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let filter = TransactionFilter {
            status: Some(TransactionStatus::Completed),
            start_date: Some(start),
            end_date: Some(end),
            ..TransactionFilter::default()
        };
        self.list_all(user_id, &filter, TransactionSort::DateAsc).await
    }

    /// A user's recurring transactions that are not cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fixed(&self, user_id: Uuid) -> Result<Vec<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::IsFixed.eq(true))
            .filter(transactions::Column::Status.ne(TransactionStatus::Cancelled))
            .order_by_asc(transactions::Column::Date)
            .all(&self.db)
            .await
    }

    /// Replaces every writable field, returning the row before and after.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if missing or not owned.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: TransactionInput,
    ) -> Result<(transactions::Model, transactions::Model), TransactionError> {
        let before = self
            .find_owned(user_id, id)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        let mut active: transactions::ActiveModel = before.clone().into();
        active.account_id = Set(input.account_id);
        active.to_account_id = Set(input.to_account_id);
        active.category_id = Set(input.category_id);
        active.description = Set(input.description);
        active.amount_cents = Set(to_minor_units(input.amount)?);
        active.transaction_type = Set(input.transaction_type);
        active.status = Set(input.status);
        active.date = Set(input.date);
        active.is_fixed = Set(input.is_fixed);
        active.fixed_frequency = Set(input.fixed_frequency);
        active.notes = Set(input.notes);
        active.updated_at = Set(Utc::now());

        let after = active.update(&self.db).await?;
        Ok((before, after))
    }

    /// Deletes a transaction, returning the removed row.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if missing or not owned.
    pub async fn delete(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        let existing = self
            .find_owned(user_id, id)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        transactions::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(existing)
    }
}

#[async_trait]
impl ports::TransactionRepository for TransactionRepository {
    async fn completed_touching_account(
        &self,
        account_id: Uuid,
    ) -> AppResult<Vec<TransactionRecord>> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::Status.eq(TransactionStatus::Completed))
            .filter(
                Condition::any()
                    .add(transactions::Column::AccountId.eq(account_id))
                    .add(transactions::Column::ToAccountId.eq(account_id)),
            )
            .all(&self.db)
            .await
            .map_err(database_error)?;

        Ok(to_records(&rows))
    }

    async fn completed_expenses_in_window(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<TransactionRecord>> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::CategoryId.eq(category_id))
            .filter(transactions::Column::TransactionType.eq(TransactionType::Expense))
            .filter(transactions::Column::Status.eq(TransactionStatus::Completed))
            .filter(transactions::Column::Date.between(start, end))
            .all(&self.db)
            .await
            .map_err(database_error)?;

        Ok(to_records(&rows))
    }
}
