//! Create `employees` table.
//!
//! `email` carries the unique constraint that registration relies on to
//! settle concurrent sign-ups with the same address.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(text(Employees::FirstName).not_null())
                    .col(text(Employees::LastName).not_null())
                    .col(string_len(Employees::Phone, 64).not_null())
                    .col(string_len(Employees::Email, 320).unique_key().not_null())
                    .col(string_len(Employees::PasswordHash, 255).not_null())
                    .col(
                        ColumnDef::new(Employees::ActiveStatus)
                            .small_integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(Employees::ActiveStatus).is_in([0, 1])),
                    )
                    .col(string_len(Employees::Role, 32).not_null())
                    .col(timestamp_with_time_zone(Employees::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Employees::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Employees::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FirstName,
    LastName,
    Phone,
    Email,
    PasswordHash,
    ActiveStatus,
    Role,
    CreatedAt,
    UpdatedAt,
}
