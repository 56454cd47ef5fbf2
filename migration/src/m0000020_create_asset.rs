use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Asset::Table)
                    .col(ColumnDef::new(Asset::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Asset::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Asset::Category)
                            .string_len(255)
                            .not_null()
                            .default("General"),
                    )
                    .col(
                        ColumnDef::new(Asset::Status)
                            .string_len(31)
                            .not_null()
                            .default("operational"),
                    )
                    .col(
                        ColumnDef::new(Asset::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Asset::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Asset::Depreciation).date())
                    .col(ColumnDef::new(Asset::AssignedTo).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_assigned_to")
                            .from(Asset::Table, Asset::AssignedTo)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // the list view always orders by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_asset_created_at")
                    .table(Asset::Table)
                    .col(Asset::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Asset::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Asset {
    Table,
    Id,
    Name,
    Category,
    Status,
    CreatedAt,
    UpdatedAt,
    Depreciation,
    AssignedTo,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
