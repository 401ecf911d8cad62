use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Activities::Level)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(Activities::Level).between(1, 3)),
                    )
                    .col(ColumnDef::new(Activities::ParentId).integer().null())
                    // 親を削除すると子孫も削除される
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_parent_id")
                            .from(Activities::Table, Activities::ParentId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activities_parent_id")
                    .table(Activities::Table)
                    .col(Activities::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    Name,
    Level,
    ParentId,
}
