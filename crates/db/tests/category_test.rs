//! Integration tests for Category repository.

mod common;

use rust_decimal_macros::dec;

use financeflow_db::entities::sea_orm_active_enums::{CategoryType, TransactionType};
use financeflow_db::repositories::{
    CategoryError, CategoryFilter, CategoryRepository, CreateCategoryInput, UpdateCategoryInput,
};
use financeflow_db::DeleteOutcome;

use common::{create_account, create_category, create_transaction, date, input};

fn named(name: &str, category_type: CategoryType) -> CreateCategoryInput {
    CreateCategoryInput {
        name: name.to_string(),
        category_type,
        budget: Some(dec!(300)),
        color: Some("#ff0000".to_string()),
        icon: None,
    }
}

#[tokio::test]
async fn test_names_are_unique_ignoring_case_per_type() {
    let db = common::setup_db().await;
    let user_id = common::create_user(&db).await;
    let repo = CategoryRepository::new(db.clone());

    let food = repo.create(user_id, named("Food", CategoryType::Expense)).await.unwrap();
    assert_eq!(food.budget_cents, Some(30_000));

    let clash = repo.create(user_id, named("  FOOD ", CategoryType::Expense)).await;
    assert!(matches!(clash, Err(CategoryError::DuplicateName(_))));

    // Same name is fine for the other type and for another user.
    repo.create(user_id, named("food", CategoryType::Income)).await.unwrap();
    let other = common::create_user(&db).await;
    repo.create(other, named("Food", CategoryType::Expense)).await.unwrap();
}

#[tokio::test]
async fn test_rename_checks_uniqueness_excluding_self() {
    let db = common::setup_db().await;
    let user_id = common::create_user(&db).await;
    let repo = CategoryRepository::new(db.clone());

    let food = create_category(&db, user_id, "Food", CategoryType::Expense).await;
    create_category(&db, user_id, "Rent", CategoryType::Expense).await;

    let same = repo
        .update(
            user_id,
            food.id,
            UpdateCategoryInput {
                name: Some("food".to_string()),
                ..UpdateCategoryInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.name, "food");

    let clash = repo
        .update(
            user_id,
            food.id,
            UpdateCategoryInput {
                name: Some("RENT".to_string()),
                ..UpdateCategoryInput::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(CategoryError::DuplicateName(_))));
}

#[tokio::test]
async fn test_delete_soft_when_referenced() {
    let db = common::setup_db().await;
    let user_id = common::create_user(&db).await;
    let repo = CategoryRepository::new(db.clone());
    let account = create_account(&db, user_id, dec!(0)).await;

    let used = create_category(&db, user_id, "Used", CategoryType::Expense).await;
    let unused = create_category(&db, user_id, "Unused", CategoryType::Expense).await;
    create_transaction(
        &db,
        user_id,
        input(TransactionType::Expense, dec!(1), account.id, Some(used.id), date(2024, 1, 1)),
    )
    .await;

    assert!(matches!(
        repo.delete(user_id, used.id).await.unwrap(),
        DeleteOutcome::Deactivated(c) if !c.is_active
    ));
    assert_eq!(repo.delete(user_id, unused.id).await.unwrap(), DeleteOutcome::Deleted);

    let active = repo
        .list(
            user_id,
            CategoryFilter {
                is_active: Some(true),
                ..CategoryFilter::default()
            },
        )
        .await
        .unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn test_type_is_fixed_once_referenced() {
    let db = common::setup_db().await;
    let user_id = common::create_user(&db).await;
    let repo = CategoryRepository::new(db.clone());
    let account = create_account(&db, user_id, dec!(0)).await;

    let used = create_category(&db, user_id, "Food", CategoryType::Expense).await;
    let fresh = create_category(&db, user_id, "Gifts", CategoryType::Expense).await;
    create_transaction(
        &db,
        user_id,
        input(TransactionType::Expense, dec!(300), account.id, Some(used.id), date(2024, 1, 1)),
    )
    .await;

    let to_income = || UpdateCategoryInput {
        category_type: Some(CategoryType::Income),
        ..UpdateCategoryInput::default()
    };

    let blocked = repo.update(user_id, used.id, to_income()).await;
    assert!(matches!(blocked, Err(CategoryError::TypeInUse(_))));
    let unchanged = repo.find_owned(user_id, used.id).await.unwrap().unwrap();
    assert_eq!(unchanged.category_type, CategoryType::Expense);

    let retyped = repo.update(user_id, fresh.id, to_income()).await.unwrap();
    assert_eq!(retyped.category_type, CategoryType::Income);

    // Restating the current type is not a change.
    let same = repo
        .update(
            user_id,
            used.id,
            UpdateCategoryInput {
                name: Some("Groceries".to_string()),
                category_type: Some(CategoryType::Expense),
                ..UpdateCategoryInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.name, "Groceries");
}
