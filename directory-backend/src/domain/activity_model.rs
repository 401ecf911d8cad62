// src/domain/activity_model.rs
use crate::error::AppError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_LEVEL: i32 = 1;
pub const MAX_LEVEL: i32 = 3;

/// 活動（業種）ツリーのノード。parent_id による自己参照で森を構成する
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub level: i32,
    #[sea_orm(nullable)]
    pub parent_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    #[error("Activity level must be between 1 and 3, got {0}")]
    LevelOutOfRange(i32),

    #[error("Cannot create a child activity under level {level} activity {parent_id}")]
    ParentAtMaxDepth { parent_id: i32, level: i32 },

    #[error("Parent activity {0} does not exist")]
    ParentNotFound(i32),

    #[error("Activity {0} cannot be its own parent")]
    SelfParent(i32),

    #[error("Activity {parent_id} is a descendant of activity {activity_id}")]
    ParentIsDescendant { activity_id: i32, parent_id: i32 },

    #[error("Activity level must be {expected} under its parent, got {got}")]
    LevelMismatch { expected: i32, got: i32 },

    #[error("Activity {activity_id} at level {level} would put its descendants at level {deepest_level}")]
    SubtreeTooDeep {
        activity_id: i32,
        level: i32,
        deepest_level: i32,
    },
}

impl From<ActivityValidationError> for AppError {
    fn from(err: ActivityValidationError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

/// レベルは 1..=3 のみ許可
pub fn validate_activity_level(level: i32) -> Result<i32, ActivityValidationError> {
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        return Err(ActivityValidationError::LevelOutOfRange(level));
    }
    Ok(level)
}

/// 親候補のレベルを `parent_level` で引き、レベル3の下には子を作らせない
pub fn validate_activity_parent<F>(
    parent_id: Option<i32>,
    parent_level: F,
) -> Result<Option<i32>, ActivityValidationError>
where
    F: FnOnce(i32) -> Option<i32>,
{
    let Some(parent_id) = parent_id else {
        return Ok(None);
    };

    match parent_level(parent_id) {
        None => Err(ActivityValidationError::ParentNotFound(parent_id)),
        Some(level) if level >= MAX_LEVEL => {
            Err(ActivityValidationError::ParentAtMaxDepth { parent_id, level })
        }
        Some(_) => Ok(Some(parent_id)),
    }
}

/// 更新時の付け替え検証。自分自身や子孫を親にするとツリーが循環する
pub fn validate_reparent(
    activity_id: i32,
    new_parent_id: Option<i32>,
    descendant_ids: &[i32],
) -> Result<(), ActivityValidationError> {
    match new_parent_id {
        Some(parent_id) if parent_id == activity_id => {
            Err(ActivityValidationError::SelfParent(activity_id))
        }
        Some(parent_id) if descendant_ids.contains(&parent_id) => {
            Err(ActivityValidationError::ParentIsDescendant {
                activity_id,
                parent_id,
            })
        }
        _ => Ok(()),
    }
}

/// レベル省略時は親のレベル + 1（ルートは 1）
pub fn derive_level(parent_level: Option<i32>) -> i32 {
    parent_level.map_or(MIN_LEVEL, |level| level + 1)
}

/// 書き込むレベルを決める。明示されたレベルは親から導いた値と一致しなければならない
pub fn resolve_level(
    requested: Option<i32>,
    parent_level: Option<i32>,
) -> Result<i32, ActivityValidationError> {
    let expected = derive_level(parent_level);
    if let Some(got) = requested {
        validate_activity_level(got)?;
        if got != expected {
            return Err(ActivityValidationError::LevelMismatch { expected, got });
        }
    }
    validate_activity_level(expected)
}

/// `level` に置いたとき、根から `max_depth` 下の子孫がレベル3を超えないこと
pub fn validate_subtree_depth(
    activity_id: i32,
    level: i32,
    max_depth: i32,
) -> Result<(), ActivityValidationError> {
    let deepest_level = level + max_depth;
    if deepest_level > MAX_LEVEL {
        return Err(ActivityValidationError::SubtreeTooDeep {
            activity_id,
            level,
            deepest_level,
        });
    }
    Ok(())
}
