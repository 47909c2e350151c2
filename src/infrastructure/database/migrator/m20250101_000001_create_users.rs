//! Migration to create users table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Users::UserName)
                            .string_len(30)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(20)
                            .not_null()
                            .default("user"),
                    )
                    .col(ColumnDef::new(Users::Avatar).string().null())
                    .col(ColumnDef::new(Users::Bio).string_len(500).null())
                    .col(ColumnDef::new(Users::City).string_len(100).null())
                    .col(ColumnDef::new(Users::PhoneNumber).string_len(32).null())
                    .col(ColumnDef::new(Users::FirstNameFolded).string().not_null())
                    .col(ColumnDef::new(Users::LastNameFolded).string().not_null())
                    .col(ColumnDef::new(Users::UserNameFolded).string().not_null())
                    .col(ColumnDef::new(Users::BioFolded).text().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    UserName,
    Email,
    PasswordHash,
    Role,
    Avatar,
    Bio,
    City,
    PhoneNumber,
    FirstNameFolded,
    LastNameFolded,
    UserNameFolded,
    BioFolded,
    CreatedAt,
    UpdatedAt,
}
