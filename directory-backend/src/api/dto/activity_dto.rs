// src/api/dto/activity_dto.rs
use crate::domain::activity_model;
use crate::utils::validation::common;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CreateActivityDto {
    #[validate(
        length(
            min = common::activity::NAME_MIN_LENGTH,
            max = common::activity::NAME_MAX_LENGTH,
            message = "Activity name must be between 1 and 200 characters"
        ),
        custom(function = common::validate_not_blank)
    )]
    pub name: String,

    pub parent_id: Option<i32>,

    // 省略時は親のレベル + 1
    pub level: Option<i32>,
}

/// 部分更新。`parent_id` は「未指定」と「null（ルートへ移動）」を区別する
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct UpdateActivityDto {
    #[validate(
        length(
            min = common::activity::NAME_MIN_LENGTH,
            max = common::activity::NAME_MAX_LENGTH,
            message = "Activity name must be between 1 and 200 characters"
        ),
        custom(function = common::validate_not_blank)
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "present_or_null")]
    pub parent_id: Option<Option<i32>>,

    pub level: Option<i32>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 活動の表現。`children` は直下の子のみで、子自身の `children` は null
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActivityResponse {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub level: i32,
    pub children: Option<Vec<ActivityResponse>>,
}

impl ActivityResponse {
    pub fn with_children(
        model: activity_model::Model,
        children: Vec<activity_model::Model>,
    ) -> Self {
        Self {
            children: Some(children.into_iter().map(Self::from).collect()),
            ..Self::from(model)
        }
    }
}

impl From<activity_model::Model> for ActivityResponse {
    fn from(model: activity_model::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            parent_id: model.parent_id,
            level: model.level,
            children: None,
        }
    }
}
