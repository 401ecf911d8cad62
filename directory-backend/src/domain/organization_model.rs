// src/domain/organization_model.rs
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub building_id: i32,
    // PostgreSQL の text[]
    pub phone_numbers: Vec<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::building_model::Entity",
        from = "Column::BuildingId",
        to = "super::building_model::Column::Id",
        on_delete = "Cascade"
    )]
    Building,
    #[sea_orm(has_many = "super::organization_activity_model::Entity")]
    OrganizationActivity,
}

impl Related<super::building_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

// 中間テーブル経由の多対多
impl Related<super::activity_model::Entity> for Entity {
    fn to() -> RelationDef {
        super::organization_activity_model::Relation::Activity.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::organization_activity_model::Relation::Organization.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
