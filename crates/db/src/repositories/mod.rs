//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query that reads or writes user data filters by the owner's ID.

pub mod account;
pub mod budget;
pub mod category;
pub mod transaction;
pub mod user;

pub use account::{
    AccountError, AccountFilter, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
pub use budget::{
    BudgetError, BudgetFilter, BudgetRepository, CreateBudgetInput, UpdateBudgetInput,
};
pub use category::{
    CategoryError, CategoryFilter, CategoryRepository, CreateCategoryInput, UpdateCategoryInput,
};
pub use transaction::{
    TransactionError, TransactionFilter, TransactionInput, TransactionRepository, TransactionSort,
    to_records,
};
pub use user::{CreateUserInput, UpdateUserInput, UserError, UserRepository};

use financeflow_shared::AppError;
use sea_orm::DbErr;

/// Result of deleting a row that may still be referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome<M> {
    /// Nothing referenced the row; it is gone.
    Deleted,
    /// The row is still referenced and was deactivated instead.
    Deactivated(M),
}

/// Maps a raw database error into the application taxonomy.
pub fn database_error(err: DbErr) -> AppError {
    AppError::Database(err.to_string())
}
