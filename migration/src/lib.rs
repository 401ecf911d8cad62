// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// ディレクトリ関連マイグレーション
mod m20250801_000001_create_buildings_table;
mod m20250801_000002_create_activities_table;
mod m20250801_000003_create_organizations_table;
mod m20250801_000004_create_organization_activity_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 依存関係のないテーブル
            Box::new(m20250801_000001_create_buildings_table::Migration),
            Box::new(m20250801_000002_create_activities_table::Migration),
            // 2. buildings に依存
            Box::new(m20250801_000003_create_organizations_table::Migration),
            // 3. organizations / activities の中間テーブル
            Box::new(m20250801_000004_create_organization_activity_table::Migration),
        ]
    }
}
