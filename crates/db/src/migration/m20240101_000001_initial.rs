use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    Type,
    BalanceCents,
    InitialBalanceCents,
    Currency,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    Type,
    BudgetCents,
    Color,
    Icon,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    AccountId,
    ToAccountId,
    CategoryId,
    Description,
    AmountCents,
    Type,
    Status,
    Date,
    IsFixed,
    FixedFrequency,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    UserId,
    CategoryId,
    Name,
    AmountCents,
    SpentCents,
    Period,
    StartDate,
    EndDate,
    AlertThreshold,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

fn timestamps<T: IntoIden>(table: &mut TableCreateStatement, created: T, updated: T) {
    table
        .col(
            ColumnDef::new(created)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(updated)
                .timestamp_with_time_zone()
                .not_null(),
        );
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut users = Table::create();
        users
            .table(Users::Table)
            .if_not_exists()
            .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
            .col(ColumnDef::new(Users::PasswordHash).string().not_null())
            .col(ColumnDef::new(Users::Name).string().not_null())
            .col(
                ColumnDef::new(Users::Role)
                    .string_len(16)
                    .not_null()
                    .default("user"),
            )
            .col(
                ColumnDef::new(Users::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        timestamps(&mut users, Users::CreatedAt, Users::UpdatedAt);
        manager.create_table(users.to_owned()).await?;

        let mut accounts = Table::create();
        accounts
            .table(Accounts::Table)
            .if_not_exists()
            .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Accounts::UserId).uuid().not_null())
            .col(ColumnDef::new(Accounts::Name).string().not_null())
            .col(ColumnDef::new(Accounts::Type).string_len(16).not_null())
            .col(
                ColumnDef::new(Accounts::BalanceCents)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Accounts::InitialBalanceCents)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Accounts::Currency)
                    .string_len(3)
                    .not_null()
                    .default("BRL"),
            )
            .col(
                ColumnDef::new(Accounts::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-accounts-user_id")
                    .from(Accounts::Table, Accounts::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        timestamps(&mut accounts, Accounts::CreatedAt, Accounts::UpdatedAt);
        manager.create_table(accounts.to_owned()).await?;

        let mut categories = Table::create();
        categories
            .table(Categories::Table)
            .if_not_exists()
            .col(ColumnDef::new(Categories::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Categories::UserId).uuid().not_null())
            .col(ColumnDef::new(Categories::Name).string().not_null())
            .col(ColumnDef::new(Categories::Type).string_len(16).not_null())
            .col(ColumnDef::new(Categories::BudgetCents).big_integer())
            .col(ColumnDef::new(Categories::Color).string_len(16))
            .col(ColumnDef::new(Categories::Icon).string_len(64))
            .col(
                ColumnDef::new(Categories::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-categories-user_id")
                    .from(Categories::Table, Categories::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        timestamps(&mut categories, Categories::CreatedAt, Categories::UpdatedAt);
        manager.create_table(categories.to_owned()).await?;

        // Accounts and categories are soft-deleted while referenced, so the
        // foreign keys below never need to cascade.
        let mut transactions = Table::create();
        transactions
            .table(Transactions::Table)
            .if_not_exists()
            .col(ColumnDef::new(Transactions::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Transactions::UserId).uuid().not_null())
            .col(ColumnDef::new(Transactions::AccountId).uuid().not_null())
            .col(ColumnDef::new(Transactions::ToAccountId).uuid())
            .col(ColumnDef::new(Transactions::CategoryId).uuid())
            .col(ColumnDef::new(Transactions::Description).string().not_null())
            .col(
                ColumnDef::new(Transactions::AmountCents)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(Transactions::Type).string_len(16).not_null())
            .col(
                ColumnDef::new(Transactions::Status)
                    .string_len(16)
                    .not_null()
                    .default("completed"),
            )
            .col(ColumnDef::new(Transactions::Date).date().not_null())
            .col(
                ColumnDef::new(Transactions::IsFixed)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(Transactions::FixedFrequency).string_len(16))
            .col(ColumnDef::new(Transactions::Notes).text())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transactions-user_id")
                    .from(Transactions::Table, Transactions::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transactions-account_id")
                    .from(Transactions::Table, Transactions::AccountId)
                    .to(Accounts::Table, Accounts::Id),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transactions-to_account_id")
                    .from(Transactions::Table, Transactions::ToAccountId)
                    .to(Accounts::Table, Accounts::Id),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transactions-category_id")
                    .from(Transactions::Table, Transactions::CategoryId)
                    .to(Categories::Table, Categories::Id),
            );
        timestamps(
            &mut transactions,
            Transactions::CreatedAt,
            Transactions::UpdatedAt,
        );
        manager.create_table(transactions.to_owned()).await?;

        let mut budgets = Table::create();
        budgets
            .table(Budgets::Table)
            .if_not_exists()
            .col(ColumnDef::new(Budgets::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Budgets::UserId).uuid().not_null())
            .col(ColumnDef::new(Budgets::CategoryId).uuid().not_null())
            .col(ColumnDef::new(Budgets::Name).string().not_null())
            .col(ColumnDef::new(Budgets::AmountCents).big_integer().not_null())
            .col(
                ColumnDef::new(Budgets::SpentCents)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(Budgets::Period).string_len(16).not_null())
            .col(ColumnDef::new(Budgets::StartDate).date().not_null())
            .col(ColumnDef::new(Budgets::EndDate).date().not_null())
            .col(
                ColumnDef::new(Budgets::AlertThreshold)
                    .integer()
                    .not_null()
                    .default(80),
            )
            .col(
                ColumnDef::new(Budgets::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-budgets-user_id")
                    .from(Budgets::Table, Budgets::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-budgets-category_id")
                    .from(Budgets::Table, Budgets::CategoryId)
                    .to(Categories::Table, Categories::Id),
            );
        timestamps(&mut budgets, Budgets::CreatedAt, Budgets::UpdatedAt);
        manager.create_table(budgets.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-account_id")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-to_account_id")
                    .table(Transactions::Table)
                    .col(Transactions::ToAccountId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-category_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::CategoryId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-user_id")
                    .table(Budgets::Table)
                    .col(Budgets::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
