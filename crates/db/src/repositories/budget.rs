//! Budget repository.
//!
//! `spent_cents` is written only through [`ports::BudgetRepository::store_spent`].

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use financeflow_core::repository::{self as ports, BudgetScope};
use financeflow_shared::types::{MoneyError, to_minor_units};
use financeflow_shared::{AppError, AppResult};

use super::database_error;
use crate::entities::{budgets, sea_orm_active_enums::BudgetPeriod};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget not found, or owned by someone else.
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// Amount cannot be stored.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) => Self::NotFound("Budget not found".to_string()),
            BudgetError::Money(e) => e.into(),
            BudgetError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a budget. Validated by the caller.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Display name.
    pub name: String,
    /// Planned amount.
    pub amount: Decimal,
    /// Cadence.
    pub period: BudgetPeriod,
    /// First day counted.
    pub start_date: NaiveDate,
    /// Last day counted.
    pub end_date: NaiveDate,
    /// Tracked expense category.
    pub category_id: Uuid,
    /// Near-limit threshold, in percent.
    pub alert_threshold: i32,
}

/// Input for updating a budget.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    /// Display name.
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
    /// Near-limit threshold, in percent.
    pub alert_threshold: Option<i32>,
    /// Whether the budget is active.
    pub is_active: Option<bool>,
}

/// Filter options for listing budgets.
#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Filter by cadence.
    pub period: Option<BudgetPeriod>,
}

/// Budget repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a budget with nothing spent yet.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Money` if the amount has sub-cent precision.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let now = Utc::now();
        let budget = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            category_id: Set(input.category_id),
            name: Set(input.name),
            amount_cents: Set(to_minor_units(input.amount)?),
            spent_cents: Set(0),
            period: Set(input.period),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            alert_threshold: Set(input.alert_threshold),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(budget.insert(&self.db).await?)
    }

    /// Lists a user's budgets, most recent window first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: BudgetFilter,
    ) -> Result<Vec<budgets::Model>, DbErr> {
        let mut query = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .order_by_desc(budgets::Column::StartDate)
            .order_by_asc(budgets::Column::Name);

        if let Some(is_active) = filter.is_active {
            query = query.filter(budgets::Column::IsActive.eq(is_active));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(budgets::Column::CategoryId.eq(category_id));
        }
        if let Some(period) = filter.period {
            query = query.filter(budgets::Column::Period.eq(period));
        }

        query.all(&self.db).await
    }

    /// Finds a budget owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<budgets::Model>, DbErr> {
        budgets::Entity::find_by_id(id)
            .filter(budgets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Updates a budget. The merged result must already be validated.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if missing or not owned.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let budget = self
            .find_owned(user_id, id)
            .await?
            .ok_or(BudgetError::NotFound(id))?;

        let mut active: budgets::ActiveModel = budget.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(amount) = input.amount {
            active.amount_cents = Set(to_minor_units(amount)?);
        }
        if let Some(period) = input.period {
            active.period = Set(period);
        }
        if let Some(start_date) = input.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = input.end_date {
            active.end_date = Set(end_date);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(alert_threshold) = input.alert_threshold {
            active.alert_threshold = Set(alert_threshold);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if missing or not owned.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), BudgetError> {
        let result = budgets::Entity::delete_many()
            .filter(budgets::Column::Id.eq(id))
            .filter(budgets::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(BudgetError::NotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl ports::BudgetRepository for BudgetRepository {
    async fn budget_scope(&self, budget_id: Uuid) -> AppResult<Option<BudgetScope>> {
        let budget = budgets::Entity::find_by_id(budget_id)
            .one(&self.db)
            .await
            .map_err(database_error)?;

        Ok(budget.map(|b| BudgetScope {
            budget_id: b.id,
            user_id: b.user_id,
            category_id: b.category_id,
            start_date: b.start_date,
            end_date: b.end_date,
        }))
    }

    async fn store_spent(&self, budget_id: Uuid, spent: Decimal) -> AppResult<()> {
        let cents = to_minor_units(spent)?;
        budgets::Entity::update_many()
            .col_expr(budgets::Column::SpentCents, cents.into())
            .col_expr(budgets::Column::UpdatedAt, Utc::now().into())
            .filter(budgets::Column::Id.eq(budget_id))
            .exec(&self.db)
            .await
            .map_err(database_error)?;
        Ok(())
    }
}
