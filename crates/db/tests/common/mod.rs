//! Shared fixtures for repository tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use financeflow_db::entities::sea_orm_active_enums::{
    AccountType, CategoryType, TransactionStatus, TransactionType, UserRole,
};
use financeflow_db::entities::{accounts, categories, transactions};
use financeflow_db::migration::{Migrator, MigratorTrait};
use financeflow_db::repositories::{
    AccountRepository, CategoryRepository, CreateAccountInput, CreateCategoryInput,
    CreateUserInput, TransactionInput, TransactionRepository, UserRepository,
};

/// Fresh in-memory database with the schema applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn create_user(db: &DatabaseConnection) -> Uuid {
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$test_hash".to_string(),
            name: "Test User".to_string(),
            role: UserRole::User,
        })
        .await
        .expect("Failed to create user")
        .id
}

pub async fn create_account(
    db: &DatabaseConnection,
    user_id: Uuid,
    initial: Decimal,
) -> accounts::Model {
    AccountRepository::new(db.clone())
        .create(
            user_id,
            CreateAccountInput {
                name: format!("Account {}", &Uuid::new_v4().to_string()[..8]),
                account_type: AccountType::Checking,
                initial_balance: initial,
                currency: "BRL".to_string(),
            },
        )
        .await
        .expect("Failed to create account")
}

pub async fn create_category(
    db: &DatabaseConnection,
    user_id: Uuid,
    name: &str,
    category_type: CategoryType,
) -> categories::Model {
    CategoryRepository::new(db.clone())
        .create(
            user_id,
            CreateCategoryInput {
                name: name.to_string(),
                category_type,
                budget: None,
                color: None,
                icon: None,
            },
        )
        .await
        .expect("Failed to create category")
}

pub fn input(
    transaction_type: TransactionType,
    amount: Decimal,
    account_id: Uuid,
    category_id: Option<Uuid>,
    day: NaiveDate,
) -> TransactionInput {
    TransactionInput {
        description: format!("{transaction_type:?} {amount}"),
        amount,
        transaction_type,
        status: TransactionStatus::Completed,
        date: day,
        account_id,
        to_account_id: None,
        category_id,
        is_fixed: false,
        fixed_frequency: None,
        notes: None,
    }
}

pub async fn create_transaction(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: TransactionInput,
) -> transactions::Model {
    TransactionRepository::new(db.clone())
        .create(user_id, input)
        .await
        .expect("Failed to create transaction")
}
