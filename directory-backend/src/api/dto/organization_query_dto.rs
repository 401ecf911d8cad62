// src/api/dto/organization_query_dto.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

/// GET /organizations のクエリ
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrganizationListQuery {
    pub building_id: Option<i32>,
    pub activity_id: Option<i32>,
    pub name: Option<String>,
    pub activity_search: Option<String>,
    #[serde(default)]
    pub include_subactivities: bool,
}

impl OrganizationListQuery {
    /// 空文字・空白のみは「指定なし」として扱う
    pub fn name_filter(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn activity_search_filter(&self) -> Option<&str> {
        non_blank(self.activity_search.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RadiusSearchQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,

    #[validate(range(exclusive_min = 0.0, message = "radius_km must be greater than 0"))]
    pub radius_km: f64,
}

/// 境界は両端を含む
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate)]
pub struct RectangleSearchQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub min_lat: f64,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub max_lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub min_lon: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub max_lon: f64,
}
