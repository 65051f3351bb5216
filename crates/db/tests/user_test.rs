//! Integration tests for User repository.

mod common;

use financeflow_db::UserRepository;
use financeflow_db::entities::sea_orm_active_enums::UserRole;
use financeflow_db::repositories::{CreateUserInput, UpdateUserInput, UserError};

fn new_user(email: &str) -> CreateUserInput {
    CreateUserInput {
        email: email.to_string(),
        password_hash: "$argon2id$test_hash".to_string(),
        name: "Test User".to_string(),
        role: UserRole::User,
    }
}

#[tokio::test]
async fn test_user_create_and_find() {
    let db = common::setup_db().await;
    let repo = UserRepository::new(db);

    let user = repo.create(new_user("ana@example.com")).await.unwrap();
    assert_eq!(user.role, UserRole::User);
    assert!(user.is_active);

    let by_id = repo.find_by_id(user.id).await.unwrap().expect("User should exist");
    assert_eq!(by_id.email, "ana@example.com");

    let by_email = repo.find_by_email("ana@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_without_new_row() {
    let db = common::setup_db().await;
    let repo = UserRepository::new(db);

    repo.create(new_user("dup@example.com")).await.unwrap();
    let second = repo.create(new_user("dup@example.com")).await;

    assert!(matches!(second, Err(UserError::DuplicateEmail(_))));
    let overview = repo.overview().await.unwrap();
    assert_eq!(overview.total_users, 1);
}

#[tokio::test]
async fn test_update_and_overview() {
    let db = common::setup_db().await;
    let repo = UserRepository::new(db);

    let a = repo.create(new_user("a@example.com")).await.unwrap();
    let b = repo.create(new_user("b@example.com")).await.unwrap();

    repo.update(
        a.id,
        UpdateUserInput {
            role: Some(UserRole::Admin),
            ..UpdateUserInput::default()
        },
    )
    .await
    .unwrap();
    repo.update(
        b.id,
        UpdateUserInput {
            is_active: Some(false),
            ..UpdateUserInput::default()
        },
    )
    .await
    .unwrap();

    let clash = repo
        .update(
            b.id,
            UpdateUserInput {
                email: Some("a@example.com".to_string()),
                ..UpdateUserInput::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(UserError::DuplicateEmail(_))));

    let overview = repo.overview().await.unwrap();
    assert_eq!(overview.total_users, 2);
    assert_eq!(overview.active_users, 1);
    assert_eq!(overview.admin_users, 1);
    assert_eq!(overview.new_users_last_30_days, 2);
}

#[tokio::test]
async fn test_delete_missing_user() {
    let db = common::setup_db().await;
    let repo = UserRepository::new(db);

    let result = repo.delete(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(UserError::NotFound(_))));
}
