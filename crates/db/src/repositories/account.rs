//! Account repository.
//!
//! `balance_cents` is written only through [`ports::AccountRepository::store_balance`];
//! updates through this repository never touch it or the opening balance.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use financeflow_core::repository as ports;
use financeflow_shared::types::{MoneyError, from_minor_units, to_minor_units};
use financeflow_shared::{AppError, AppResult};

use super::{DeleteOutcome, database_error};
use crate::entities::{accounts, sea_orm_active_enums::AccountType, transactions};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found, or owned by someone else.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Amount cannot be stored.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => Self::NotFound("Account not found".to_string()),
            AccountError::Money(e) => e.into(),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name.
    pub name: String,
    /// Kind of account.
    pub account_type: AccountType,
    /// Opening balance; also the starting `balance`.
    pub initial_balance: Decimal,
    /// ISO currency code.
    pub currency: String,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Display name.
    pub name: Option<String>,
    /// Kind of account.
    pub account_type: Option<AccountType>,
    /// ISO currency code.
    pub currency: Option<String>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by account type.
    pub account_type: Option<AccountType>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account whose balance starts at its opening balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Money` if the opening balance has sub-cent precision.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let initial = to_minor_units(input.initial_balance)?;
        let now = Utc::now();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(input.name),
            account_type: Set(input.account_type),
            balance_cents: Set(initial),
            initial_balance_cents: Set(initial),
            currency: Set(input.currency),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Lists a user's accounts by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, DbErr> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Name);

        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }
        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(account_type));
        }

        query.all(&self.db).await
    }

    /// Finds an account owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Updates an account's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account is missing or not owned.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self
            .find_owned(user_id, id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type);
        }
        if let Some(currency) = input.currency {
            active.currency = Set(currency);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Counts transactions referencing the account on either side.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_transactions(&self, id: Uuid) -> Result<u64, DbErr> {
        transactions::Entity::find()
            .filter(
                Condition::any()
                    .add(transactions::Column::AccountId.eq(id))
                    .add(transactions::Column::ToAccountId.eq(id)),
            )
            .count(&self.db)
            .await
    }

    /// Deletes an account, or deactivates it if transactions still reference it.
    ///
    /// Historical transactions are never touched.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account is missing or not owned.
    pub async fn delete(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<DeleteOutcome<accounts::Model>, AccountError> {
        let account = self
            .find_owned(user_id, id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        if self.count_transactions(id).await? > 0 {
            let mut active: accounts::ActiveModel = account.into();
            active.is_active = Set(false);
            active.updated_at = Set(Utc::now());
            return Ok(DeleteOutcome::Deactivated(active.update(&self.db).await?));
        }

        accounts::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl ports::AccountRepository for AccountRepository {
    async fn initial_balance(&self, account_id: Uuid) -> AppResult<Option<Decimal>> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await
            .map_err(database_error)?;

        Ok(account.map(|a| from_minor_units(a.initial_balance_cents)))
    }

    async fn store_balance(&self, account_id: Uuid, balance: Decimal) -> AppResult<()> {
        let cents = to_minor_units(balance)?;
        accounts::Entity::update_many()
            .col_expr(accounts::Column::BalanceCents, cents.into())
            .col_expr(accounts::Column::UpdatedAt, Utc::now().into())
            .filter(accounts::Column::Id.eq(account_id))
            .exec(&self.db)
            .await
            .map_err(database_error)?;
        Ok(())
    }
}
