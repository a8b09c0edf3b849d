//! Initial schema migration.
//!
//! - `users`: flatmates (administrators included)
//! - `payment_schedules`: weekly rent owed by a flatmate over a date range
//! - `transactions`: bank statement lines, optionally matched to a flatmate

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
}

#[derive(Iden)]
enum PaymentSchedules {
    Table,
    Id,
    UserId,
    WeeklyAmountMinor,
    StartDate,
    EndDate,
    Note,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    AmountMinor,
    OccurredOn,
    Description,
    Category,
    MatchType,
    MatchConfidence,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("member"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-name-unique")
                    .table(Users::Table)
                    .col(Users::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentSchedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentSchedules::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(PaymentSchedules::WeeklyAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentSchedules::StartDate).date().not_null())
                    .col(ColumnDef::new(PaymentSchedules::EndDate).date())
                    .col(ColumnDef::new(PaymentSchedules::Note).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment_schedules-user_id")
                            .from(PaymentSchedules::Table, PaymentSchedules::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_schedules-user_id-start_date")
                    .table(PaymentSchedules::Table)
                    .col(PaymentSchedules::UserId)
                    .col(PaymentSchedules::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).uuid())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::OccurredOn).date().not_null())
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Transactions::Category).string())
                    .col(
                        ColumnDef::new(Transactions::MatchType)
                            .string()
                            .not_null()
                            .default("unmatched"),
                    )
                    .col(ColumnDef::new(Transactions::MatchConfidence).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-occurred_on")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::OccurredOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of creation (FK dependencies).
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentSchedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
