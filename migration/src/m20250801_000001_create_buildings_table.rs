use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Buildings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Buildings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Buildings::Address)
                            .string_len(500)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Buildings::Latitude).double().not_null())
                    .col(ColumnDef::new(Buildings::Longitude).double().not_null())
                    .to_owned(),
            )
            .await?;

        // 矩形検索・半径検索の事前絞り込み用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_buildings_coordinates")
                    .table(Buildings::Table)
                    .col(Buildings::Latitude)
                    .col(Buildings::Longitude)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Buildings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Buildings {
    Table,
    Id,
    Address,
    Latitude,
    Longitude,
}
