// src/domain/organization_aggregate.rs
use super::{activity_model, building_model, organization_model};

/// 直下の子を伴った活動
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityWithChildren {
    pub activity: activity_model::Model,
    pub children: Vec<activity_model::Model>,
}

/// 建物・活動まで読み込み済みの組織
#[derive(Clone, Debug, PartialEq)]
pub struct OrganizationAggregate {
    pub organization: organization_model::Model,
    pub building: building_model::Model,
    pub activities: Vec<ActivityWithChildren>,
}

impl OrganizationAggregate {
    pub fn id(&self) -> i32 {
        self.organization.id
    }

    pub fn activity_ids(&self) -> Vec<i32> {
        self.activities.iter().map(|a| a.activity.id).collect()
    }
}

/// ID の重複を取り除く（最初に現れた順を保つ）
pub fn dedup_by_id(
    organizations: Vec<organization_model::Model>,
) -> Vec<organization_model::Model> {
    let mut seen = std::collections::HashSet::new();
    organizations
        .into_iter()
        .filter(|org| seen.insert(org.id))
        .collect()
}
