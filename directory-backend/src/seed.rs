// src/seed.rs

//! 初期データの投入
//!
//! 組織が1件でもあれば何もしない。確認と投入は同じトランザクションで行う。

use crate::db::DbPool;
use crate::domain::activity_model::{
    self, derive_level, validate_activity_level, ActiveModel as ActivityActiveModel,
};
use crate::domain::building_model::ActiveModel as BuildingActiveModel;
use crate::domain::organization_activity_model::{
    ActiveModel as OrganizationActivityActiveModel, Entity as OrganizationActivityEntity,
};
use crate::domain::organization_model::{
    ActiveModel as OrganizationActiveModel, Entity as OrganizationEntity,
};
use crate::error::AppResult;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub buildings: usize,
    pub activities: usize,
    pub organizations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(SeedSummary),
    AlreadySeeded,
}

pub async fn seed_database(db: &DbPool) -> AppResult<SeedOutcome> {
    let txn = db.begin().await?;

    // 同時に走った投入はここで待たされ、コミット後の件数を数える
    txn.execute_unprepared("LOCK TABLE organizations IN EXCLUSIVE MODE").await?;
    if OrganizationEntity::find().count(&txn).await? > 0 {
        txn.commit().await?;
        return Ok(SeedOutcome::AlreadySeeded);
    }

    // 活動ツリー（3階層）
    let food = insert_activity(&txn, "Food", None).await?;
    let cars = insert_activity(&txn, "Cars", None).await?;
    let meat = insert_activity(&txn, "Meat products", Some(&food)).await?;
    let dairy = insert_activity(&txn, "Dairy products", Some(&food)).await?;
    let _trucks = insert_activity(&txn, "Trucks", Some(&cars)).await?;
    let passenger = insert_activity(&txn, "Passenger cars", Some(&cars)).await?;
    let parts = insert_activity(&txn, "Spare parts", Some(&passenger)).await?;
    let accessories = insert_activity(&txn, "Accessories", Some(&passenger)).await?;

    let lenina = BuildingActiveModel {
        address: Set("Moscow, Lenina st. 1, office 3".to_string()),
        latitude: Set(55.7558),
        longitude: Set(37.6173),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    let blyukhera = BuildingActiveModel {
        address: Set("Moscow, Blyukhera st. 32/1".to_string()),
        latitude: Set(55.7510),
        longitude: Set(37.6200),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let organizations = [
        (
            "Horns and Hooves LLC",
            lenina.id,
            vec!["2-222-222", "3-333-333", "8-923-666-13-13"],
            vec![meat.id, dairy.id],
        ),
        (
            "Meat House",
            blyukhera.id,
            vec!["8-900-111-22-33"],
            vec![meat.id],
        ),
        (
            "AutoWorld",
            blyukhera.id,
            vec!["8-495-123-45-67"],
            vec![passenger.id, parts.id, accessories.id],
        ),
    ];

    for (name, building_id, phones, activity_ids) in &organizations {
        let organization = OrganizationActiveModel {
            name: Set(name.to_string()),
            building_id: Set(*building_id),
            phone_numbers: Set(phones.iter().map(|p| p.to_string()).collect()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let links = activity_ids
            .iter()
            .map(|activity_id| OrganizationActivityActiveModel {
                organization_id: Set(organization.id),
                activity_id: Set(*activity_id),
            });
        OrganizationActivityEntity::insert_many(links)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    let summary = SeedSummary {
        buildings: 2,
        activities: 8,
        organizations: organizations.len(),
    };
    info!(?summary, "Database seeded");
    Ok(SeedOutcome::Seeded(summary))
}

async fn insert_activity<C>(
    conn: &C,
    name: &str,
    parent: Option<&activity_model::Model>,
) -> AppResult<activity_model::Model>
where
    C: ConnectionTrait,
{
    let level = validate_activity_level(derive_level(parent.map(|p| p.level)))?;
    let activity = ActivityActiveModel {
        name: Set(name.to_string()),
        level: Set(level),
        parent_id: Set(parent.map(|p| p.id)),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(activity)
}
