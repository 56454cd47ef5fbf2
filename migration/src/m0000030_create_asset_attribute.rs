use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AssetAttribute::Table)
                    .col(
                        ColumnDef::new(AssetAttribute::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssetAttribute::AssetId).uuid().not_null())
                    .col(
                        ColumnDef::new(AssetAttribute::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssetAttribute::Value)
                            .string_len(1023)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_attribute_asset")
                            .from(AssetAttribute::Table, AssetAttribute::AssetId)
                            .to(Asset::Table, Asset::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_asset_attribute_asset_id")
                    .table(AssetAttribute::Table)
                    .col(AssetAttribute::AssetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssetAttribute::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AssetAttribute {
    Table,
    Id,
    AssetId,
    Name,
    Value,
}

#[derive(DeriveIden)]
enum Asset {
    Table,
    Id,
}
