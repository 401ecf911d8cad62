// src/api/dto/organization_dto.rs
use crate::api::dto::activity_dto::ActivityResponse;
use crate::api::dto::building_dto::BuildingResponse;
use crate::domain::organization_aggregate::OrganizationAggregate;
use crate::utils::validation::common;
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CreateOrganizationDto {
    #[validate(
        length(
            min = common::organization::NAME_MIN_LENGTH,
            max = common::organization::NAME_MAX_LENGTH,
            message = "Organization name must be between 1 and 300 characters"
        ),
        custom(function = common::validate_not_blank)
    )]
    pub name: String,

    pub building_id: i32,

    #[serde(default)]
    #[validate(custom(function = common::validate_phone_numbers))]
    pub phone_numbers: Vec<String>,

    #[serde(default)]
    pub activity_ids: Vec<i32>,
}

/// 部分更新。`activity_ids` を指定すると活動の集合を丸ごと置き換える
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct UpdateOrganizationDto {
    #[validate(
        length(
            min = common::organization::NAME_MIN_LENGTH,
            max = common::organization::NAME_MAX_LENGTH,
            message = "Organization name must be between 1 and 300 characters"
        ),
        custom(function = common::validate_not_blank)
    )]
    pub name: Option<String>,

    pub building_id: Option<i32>,

    #[validate(custom(function = common::validate_phone_numbers))]
    pub phone_numbers: Option<Vec<String>>,

    pub activity_ids: Option<Vec<i32>>,
}

impl UpdateOrganizationDto {
    /// 行そのもの（activity_ids 以外）に変更があるか
    pub fn touches_row(&self) -> bool {
        self.name.is_some() || self.building_id.is_some() || self.phone_numbers.is_some()
    }
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrganizationResponse {
    pub id: i32,
    pub name: String,
    pub building_id: i32,
    pub phone_numbers: Vec<String>,
    pub building: BuildingResponse,
    pub activities: Vec<ActivityResponse>,
}

impl From<OrganizationAggregate> for OrganizationResponse {
    fn from(aggregate: OrganizationAggregate) -> Self {
        let OrganizationAggregate {
            organization,
            building,
            activities,
        } = aggregate;

        Self {
            id: organization.id,
            name: organization.name,
            building_id: organization.building_id,
            phone_numbers: organization.phone_numbers,
            building: building.into(),
            activities: activities
                .into_iter()
                .map(|a| ActivityResponse::with_children(a.activity, a.children))
                .collect(),
        }
    }
}
