use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrganizationActivity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganizationActivity::OrganizationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganizationActivity::ActivityId)
                            .integer()
                            .not_null(),
                    )
                    // 同じ組み合わせの重複行を許さない
                    .primary_key(
                        Index::create()
                            .name("pk_organization_activity")
                            .col(OrganizationActivity::OrganizationId)
                            .col(OrganizationActivity::ActivityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_activity_organization_id")
                            .from(
                                OrganizationActivity::Table,
                                OrganizationActivity::OrganizationId,
                            )
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_activity_activity_id")
                            .from(OrganizationActivity::Table, OrganizationActivity::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 活動IDからの逆引き（活動フィルタ・サブツリー検索）用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_organization_activity_activity_id")
                    .table(OrganizationActivity::Table)
                    .col(OrganizationActivity::ActivityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganizationActivity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrganizationActivity {
    Table,
    OrganizationId,
    ActivityId,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
}
