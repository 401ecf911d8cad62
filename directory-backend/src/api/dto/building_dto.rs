// src/api/dto/building_dto.rs
use crate::domain::building_model;
use crate::utils::validation::common;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CreateBuildingDto {
    #[validate(
        length(
            min = common::building::ADDRESS_MIN_LENGTH,
            max = common::building::ADDRESS_MAX_LENGTH,
            message = "Address must be between 1 and 500 characters"
        ),
        custom(function = common::validate_not_blank)
    )]
    pub address: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct UpdateBuildingDto {
    #[validate(
        length(
            min = common::building::ADDRESS_MIN_LENGTH,
            max = common::building::ADDRESS_MAX_LENGTH,
            message = "Address must be between 1 and 500 characters"
        ),
        custom(function = common::validate_not_blank)
    )]
    pub address: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BuildingResponse {
    pub id: i32,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<building_model::Model> for BuildingResponse {
    fn from(model: building_model::Model) -> Self {
        Self {
            id: model.id,
            address: model.address,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}
