//! Category repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use financeflow_core::category::name_key;
use financeflow_shared::AppError;
use financeflow_shared::types::{MoneyError, to_minor_units};

use super::DeleteOutcome;
use crate::entities::{budgets, categories, sea_orm_active_enums::CategoryType, transactions};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Same name and type already used by this user.
    #[error("Category '{0}' already exists")]
    DuplicateName(String),

    /// Category not found, or owned by someone else.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Type change on a category that transactions or budgets reference.
    #[error("Category '{0}' is in use and cannot change type")]
    TypeInUse(String),

    /// Amount cannot be stored.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::DuplicateName(name) => {
                Self::Conflict(format!("A category named '{name}' already exists"))
            }
            CategoryError::NotFound(_) => Self::NotFound("Category not found".to_string()),
            CategoryError::TypeInUse(name) => Self::Validation(format!(
                "category '{name}' is used by transactions or budgets, its type cannot change"
            )),
            CategoryError::Money(e) => e.into(),
            CategoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Display name.
    pub name: String,
    /// Income or expense.
    pub category_type: CategoryType,
    /// Optional soft cap.
    pub budget: Option<Decimal>,
    /// Display color.
    pub color: Option<String>,
    /// Display icon.
    pub icon: Option<String>,
}

/// Input for updating a category.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// Display name.
    pub name: Option<String>,
    /// Income or expense.
    pub category_type: Option<CategoryType>,
    /// Soft cap; `Some(None)` clears it.
    pub budget: Option<Option<Decimal>>,
    /// Display color; `Some(None)` clears it.
    pub color: Option<Option<String>>,
    /// Display icon; `Some(None)` clears it.
    pub icon: Option<Option<String>>,
    /// Whether the category is active.
    pub is_active: Option<bool>,
}

/// Filter options for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    /// Filter by type.
    pub category_type: Option<CategoryType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns true if the user already has a category of `category_type`
    /// whose name matches ignoring case and spacing.
    ///
    /// Inactive categories count too. `except` excludes one category, for renames.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn name_taken(
        &self,
        user_id: Uuid,
        category_type: CategoryType,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let key = name_key(name);
        let siblings = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::CategoryType.eq(category_type))
            .all(&self.db)
            .await?;

        Ok(siblings
            .iter()
            .any(|c| Some(c.id) != except && name_key(&c.name) == key))
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::DuplicateName` if the name is taken for this type.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let name = input.name.trim().to_string();
        if self
            .name_taken(user_id, input.category_type, &name, None)
            .await?
        {
            return Err(CategoryError::DuplicateName(name));
        }

        let budget_cents = input.budget.map(to_minor_units).transpose()?;
        let now = Utc::now();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(name),
            category_type: Set(input.category_type),
            budget_cents: Set(budget_cents),
            color: Set(input.color),
            icon: Set(input.icon),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Lists a user's categories by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: CategoryFilter,
    ) -> Result<Vec<categories::Model>, DbErr> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name);

        if let Some(category_type) = filter.category_type {
            query = query.filter(categories::Column::CategoryType.eq(category_type));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(categories::Column::IsActive.eq(is_active));
        }

        query.all(&self.db).await
    }

    /// Finds a category owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find_by_id(id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Counts the transactions and budgets that reference a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_references(&self, id: Uuid) -> Result<u64, DbErr> {
        let referencing_transactions = transactions::Entity::find()
            .filter(transactions::Column::CategoryId.eq(id))
            .count(&self.db)
            .await?;
        let referencing_budgets = budgets::Entity::find()
            .filter(budgets::Column::CategoryId.eq(id))
            .count(&self.db)
            .await?;
        Ok(referencing_transactions + referencing_budgets)
    }

    /// Updates a category, re-checking name uniqueness if name or type change.
    ///
    /// The type is fixed once transactions or budgets reference the category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if missing or not owned,
    /// `CategoryError::DuplicateName` on a clash and `CategoryError::TypeInUse`
    /// when retyping a referenced category.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let category = self
            .find_owned(user_id, id)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let name = input
            .name
            .as_deref()
            .map_or_else(|| category.name.clone(), |n| n.trim().to_string());
        let category_type = input.category_type.unwrap_or(category.category_type);

        if category_type != category.category_type && self.count_references(id).await? > 0 {
            return Err(CategoryError::TypeInUse(category.name));
        }

        if (name != category.name || category_type != category.category_type)
            && self
                .name_taken(user_id, category_type, &name, Some(id))
                .await?
        {
            return Err(CategoryError::DuplicateName(name));
        }

        let budget_cents = input
            .budget
            .map(|b| b.map(to_minor_units).transpose())
            .transpose()?;

        let mut active: categories::ActiveModel = category.into();
        active.name = Set(name);
        active.category_type = Set(category_type);
        if let Some(budget_cents) = budget_cents {
            active.budget_cents = Set(budget_cents);
        }
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        if let Some(icon) = input.icon {
            active.icon = Set(icon);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a category, or deactivates it while transactions or budgets
    /// still reference it.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if missing or not owned.
    pub async fn delete(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<DeleteOutcome<categories::Model>, CategoryError> {
        let category = self
            .find_owned(user_id, id)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        if self.count_references(id).await? > 0 {
            let mut active: categories::ActiveModel = category.into();
            active.is_active = Set(false);
            active.updated_at = Set(Utc::now());
            return Ok(DeleteOutcome::Deactivated(active.update(&self.db).await?));
        }

        categories::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(DeleteOutcome::Deleted)
    }
}
