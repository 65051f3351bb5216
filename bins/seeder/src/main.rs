//! Database seeder for FinanceFlow development and testing.
//!
//! Seeds a demo user with accounts, categories, three months of
//! transactions and a monthly budget, then recomputes the derived
//! balances and spent figures.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use financeflow_core::auth::{hash_password, normalize_email};
use financeflow_core::balance::BalanceRecalculator;
use financeflow_core::budget::{BudgetSpentAggregator, DEFAULT_ALERT_THRESHOLD};
use financeflow_db::entities::sea_orm_active_enums::{
    AccountType, BudgetPeriod, CategoryType, FixedFrequency, TransactionStatus, TransactionType,
    UserRole,
};
use financeflow_db::repositories::{
    CreateAccountInput, CreateBudgetInput, CreateCategoryInput, CreateUserInput, TransactionInput,
};
use financeflow_db::{
    AccountRepository, BudgetRepository, CategoryRepository, TransactionRepository, UserRepository,
};

const DEMO_EMAIL: &str = "demo@financeflow.dev";
const DEMO_PASSWORD: &str = "demo123";

/// IDs of the seeded accounts and categories.
struct Seeded {
    checking: Uuid,
    savings: Uuid,
    wallet: Uuid,
    salary: Uuid,
    food: Uuid,
    transport: Uuid,
    housing: Uuid,
    leisure: Uuid,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = financeflow_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding demo user...");
    let Some(user_id) = seed_user(&db).await? else {
        println!("  Demo user already exists, skipping...");
        return Ok(());
    };

    println!("Seeding accounts and categories...");
    let seeded = seed_catalog(&db, user_id).await?;

    println!("Seeding transactions...");
    let today = Utc::now().date_naive();
    let count = seed_transactions(&db, user_id, &seeded, today).await?;
    println!("  Created {count} transactions");

    println!("Seeding budget...");
    let budget_id = seed_budget(&db, user_id, seeded.food, today).await?;

    println!("Recomputing balances and budgets...");
    let accounts = AccountRepository::new(db.clone());
    let budgets = BudgetRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    BalanceRecalculator::new(&accounts, &transactions)
        .recompute_all([seeded.checking, seeded.savings, seeded.wallet])
        .await?;
    BudgetSpentAggregator::new(&budgets, &transactions)
        .recompute_all([budget_id])
        .await?;

    println!("Seeding complete! Log in as {DEMO_EMAIL} / {DEMO_PASSWORD}");
    Ok(())
}

/// Creates the demo user, or returns `None` if it already exists.
async fn seed_user(db: &DatabaseConnection) -> anyhow::Result<Option<Uuid>> {
    let users = UserRepository::new(db.clone());
    let email = normalize_email(DEMO_EMAIL);
    if users.email_exists(&email).await? {
        return Ok(None);
    }

    let user = users
        .create(CreateUserInput {
            email,
            password_hash: hash_password(DEMO_PASSWORD)?,
            name: "Demo User".to_string(),
            role: UserRole::Admin,
        })
        .await?;
    println!("  Created demo user: {DEMO_EMAIL}");
    Ok(Some(user.id))
}

async fn seed_catalog(db: &DatabaseConnection, user_id: Uuid) -> anyhow::Result<Seeded> {
    let accounts = AccountRepository::new(db.clone());
    let mut account_ids = Vec::new();
    for (name, account_type, initial) in [
        ("Conta Corrente", AccountType::Checking, dec!(2500)),
        ("Poupança", AccountType::Savings, dec!(10000)),
        ("Carteira", AccountType::Cash, dec!(200)),
    ] {
        let account = accounts
            .create(
                user_id,
                CreateAccountInput {
                    name: name.to_string(),
                    account_type,
                    initial_balance: initial,
                    currency: "BRL".to_string(),
                },
            )
            .await?;
        account_ids.push(account.id);
    }

    let categories = CategoryRepository::new(db.clone());
    let mut category_ids = Vec::new();
    for (name, category_type, color, icon) in [
        ("Salário", CategoryType::Income, "#16a34a", "briefcase"),
        ("Alimentação", CategoryType::Expense, "#f97316", "utensils"),
        ("Transporte", CategoryType::Expense, "#0ea5e9", "car"),
        ("Moradia", CategoryType::Expense, "#8b5cf6", "home"),
        ("Lazer", CategoryType::Expense, "#ec4899", "music"),
    ] {
        let category = categories
            .create(
                user_id,
                CreateCategoryInput {
                    name: name.to_string(),
                    category_type,
                    budget: None,
                    color: Some(color.to_string()),
                    icon: Some(icon.to_string()),
                },
            )
            .await?;
        category_ids.push(category.id);
    }

    Ok(Seeded {
        checking: account_ids[0],
        savings: account_ids[1],
        wallet: account_ids[2],
        salary: category_ids[0],
        food: category_ids[1],
        transport: category_ids[2],
        housing: category_ids[3],
        leisure: category_ids[4],
    })
}

/// Books three months of salary, rent, groceries, fuel, leisure and a
/// monthly transfer into savings. Returns how many rows were created.
async fn seed_transactions(
    db: &DatabaseConnection,
    user_id: Uuid,
    seeded: &Seeded,
    today: NaiveDate,
) -> anyhow::Result<usize> {
    let repo = TransactionRepository::new(db.clone());
    let month_start = today.with_day(1).unwrap_or(today);
    let mut count = 0;

    for back in (0..3).rev() {
        let Some(month) = month_start.checked_sub_months(Months::new(back)) else {
            continue;
        };
        let day = |d: u32| month.with_day(d).unwrap_or(month);

        let rows = [
            fixed(income("Salário", dec!(6500), seeded.checking, seeded.salary, day(5))),
            fixed(expense("Aluguel", dec!(1800), seeded.checking, seeded.housing, day(10))),
            expense("Mercado", dec!(642.37), seeded.checking, seeded.food, day(12)),
            expense("Feira", dec!(85.5), seeded.wallet, seeded.food, day(14)),
            expense("Combustível", dec!(250), seeded.checking, seeded.transport, day(15)),
            expense("Cinema", dec!(64), seeded.wallet, seeded.leisure, day(20)),
            transfer("Reserva mensal", dec!(1000), seeded.checking, seeded.savings, day(6)),
        ];

        for mut row in rows {
            if row.date > today {
                row.status = TransactionStatus::Pending;
            }
            repo.create(user_id, row).await?;
            count += 1;
        }
    }

    Ok(count)
}

async fn seed_budget(
    db: &DatabaseConnection,
    user_id: Uuid,
    category_id: Uuid,
    today: NaiveDate,
) -> anyhow::Result<Uuid> {
    let start = today.with_day(1).unwrap_or(today);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(start);

    let budget = BudgetRepository::new(db.clone())
        .create(
            user_id,
            CreateBudgetInput {
                name: "Alimentação do mês".to_string(),
                amount: dec!(900),
                period: BudgetPeriod::Monthly,
                start_date: start,
                end_date: end,
                category_id,
                alert_threshold: DEFAULT_ALERT_THRESHOLD,
            },
        )
        .await?;
    Ok(budget.id)
}

fn base(
    description: &str,
    amount: Decimal,
    transaction_type: TransactionType,
    account_id: Uuid,
    date: NaiveDate,
) -> TransactionInput {
    TransactionInput {
        description: description.to_string(),
        amount,
        transaction_type,
        status: TransactionStatus::Completed,
        date,
        account_id,
        to_account_id: None,
        category_id: None,
        is_fixed: false,
        fixed_frequency: None,
        notes: None,
    }
}

fn income(
    description: &str,
    amount: Decimal,
    account_id: Uuid,
    category_id: Uuid,
    date: NaiveDate,
) -> TransactionInput {
    TransactionInput {
        category_id: Some(category_id),
        ..base(description, amount, TransactionType::Income, account_id, date)
    }
}

fn expense(
    description: &str,
    amount: Decimal,
    account_id: Uuid,
    category_id: Uuid,
    date: NaiveDate,
) -> TransactionInput {
    TransactionInput {
        category_id: Some(category_id),
        ..base(description, amount, TransactionType::Expense, account_id, date)
    }
}

fn transfer(
    description: &str,
    amount: Decimal,
    from: Uuid,
    to: Uuid,
    date: NaiveDate,
) -> TransactionInput {
    TransactionInput {
        to_account_id: Some(to),
        ..base(description, amount, TransactionType::Transfer, from, date)
    }
}

fn fixed(input: TransactionInput) -> TransactionInput {
    TransactionInput {
        is_fixed: true,
        fixed_frequency: Some(FixedFrequency::Monthly),
        ..input
    }
}
