//! User repository for database operations.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use financeflow_core::reports::UserOverview;
use financeflow_shared::{AppError, types::PageRequest};

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered.
    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateEmail(_) => Self::Conflict("Email already registered".to_string()),
            UserError::NotFound(_) => Self::NotFound("User not found".to_string()),
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a user. The email must already be normalised.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Lowercased email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: UserRole,
}

/// Input for updating a user.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// Lowercased email.
    pub email: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Role.
    pub role: Option<UserRole>,
    /// Whether the user may log in.
    pub is_active: Option<bool>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::DuplicateEmail` if the email is taken.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        if self.email_exists(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let now = Utc::now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            name: Set(input.name),
            role: Set(input.role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Lists users, newest first, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, page: &PageRequest) -> Result<(Vec<users::Model>, u64), DbErr> {
        let paginator = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page.index()).await?;
        Ok((users, total))
    }

    /// Updates a user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user does not exist and
    /// `UserError::DuplicateEmail` if the new email belongs to someone else.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<users::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or(UserError::NotFound(id))?;

        if let Some(email) = &input.email
            && *email != user.email
            && self.email_exists(email).await?
        {
            return Err(UserError::DuplicateEmail(email.clone()));
        }

        let mut active: users::ActiveModel = user.into();
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = input.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a user and, through cascading keys, everything they own.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Head counts for the admin overview.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn overview(&self) -> Result<UserOverview, DbErr> {
        let since = Utc::now() - Duration::days(30);

        Ok(UserOverview {
            total_users: users::Entity::find().count(&self.db).await?,
            active_users: users::Entity::find()
                .filter(users::Column::IsActive.eq(true))
                .count(&self.db)
                .await?,
            admin_users: users::Entity::find()
                .filter(users::Column::Role.eq(UserRole::Admin))
                .count(&self.db)
                .await?,
            new_users_last_30_days: users::Entity::find()
                .filter(users::Column::CreatedAt.gte(since))
                .count(&self.db)
                .await?,
        })
    }
}
