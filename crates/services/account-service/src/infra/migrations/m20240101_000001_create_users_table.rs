//! Migration: Create the account table.

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
                    .col(
                        ColumnDef::new(Users::UserId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string_len(64).null())
                    .col(
                        ColumnDef::new(Users::Balance)
                            .decimal_len(20, 8)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::TotalEarned)
                            .decimal_len(20, 8)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::Referrals)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::LastClaim)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::LastDaily)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Users::Wallet).string_len(42).null())
                    // No foreign key: referrers are not checked against existing rows
                    .col(ColumnDef::new(Users::ReferredBy).string_len(32).null())
                    .col(
                        ColumnDef::new(Users::JoinDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
    Username,
    Balance,
    TotalEarned,
    Referrals,
    LastClaim,
    LastDaily,
    Wallet,
    ReferredBy,
    JoinDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_create_refuses_existing_table() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        Migration.up(&SchemaManager::new(&db)).await.unwrap();

        let sql = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert!(sql.contains("CREATE TABLE \"users\""));
        assert!(!sql.contains("IF NOT EXISTS"));
        assert!(sql.contains("\"join_date\" timestamp with time zone NOT NULL"));
    }
}
