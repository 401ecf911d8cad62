// tests/common/test_data.rs
use directory_backend::api::dto::activity_dto::CreateActivityDto;
use directory_backend::api::dto::building_dto::CreateBuildingDto;
use directory_backend::api::dto::organization_dto::CreateOrganizationDto;
use directory_backend::domain::{activity_model, building_model};
use directory_backend::repository::activity_repository::ActivityRepository;
use directory_backend::repository::building_repository::BuildingRepository;
use sea_orm::DatabaseConnection;

pub const RED_SQUARE: (f64, f64) = (55.7558, 37.6173);

/// Food(1) -> Meat, Dairy / Cars -> Trucks, Passenger -> Parts, Accessories
#[derive(Debug, Clone)]
pub struct ActivityForest {
    pub food: activity_model::Model,
    pub meat: activity_model::Model,
    pub dairy: activity_model::Model,
    pub cars: activity_model::Model,
    pub trucks: activity_model::Model,
    pub passenger: activity_model::Model,
    pub parts: activity_model::Model,
    pub accessories: activity_model::Model,
}

pub fn create_activity_dto(name: &str, parent_id: Option<i32>) -> CreateActivityDto {
    CreateActivityDto {
        name: name.to_string(),
        parent_id,
        level: None,
    }
}

pub async fn create_activity(
    repo: &ActivityRepository,
    name: &str,
    parent: Option<&activity_model::Model>,
) -> activity_model::Model {
    repo.create(create_activity_dto(name, parent.map(|p| p.id)))
        .await
        .unwrap()
}

pub async fn create_activity_forest(db: &DatabaseConnection) -> ActivityForest {
    let repo = ActivityRepository::new(db.clone());

    let food = create_activity(&repo, "Food", None).await;
    let meat = create_activity(&repo, "Meat products", Some(&food)).await;
    let dairy = create_activity(&repo, "Dairy products", Some(&food)).await;
    let cars = create_activity(&repo, "Cars", None).await;
    let trucks = create_activity(&repo, "Trucks", Some(&cars)).await;
    let passenger = create_activity(&repo, "Passenger cars", Some(&cars)).await;
    let parts = create_activity(&repo, "Spare parts", Some(&passenger)).await;
    let accessories = create_activity(&repo, "Accessories", Some(&passenger)).await;

    ActivityForest {
        food,
        meat,
        dairy,
        cars,
        trucks,
        passenger,
        parts,
        accessories,
    }
}

pub fn create_building_dto(address: &str, latitude: f64, longitude: f64) -> CreateBuildingDto {
    CreateBuildingDto {
        address: address.to_string(),
        latitude,
        longitude,
    }
}

pub async fn create_building(
    db: &DatabaseConnection,
    address: &str,
    latitude: f64,
    longitude: f64,
) -> building_model::Model {
    BuildingRepository::new(db.clone())
        .create(create_building_dto(address, latitude, longitude))
        .await
        .unwrap()
}

/// 赤の広場の建物
pub async fn create_center_building(db: &DatabaseConnection) -> building_model::Model {
    create_building(db, "Moscow, Lenina st. 1, office 3", RED_SQUARE.0, RED_SQUARE.1).await
}

/// 赤の広場から北に約5km
pub async fn create_far_building(db: &DatabaseConnection) -> building_model::Model {
    create_building(db, "Moscow, Far st. 5", RED_SQUARE.0 + 0.045, RED_SQUARE.1).await
}

pub fn create_organization_dto(
    name: &str,
    building_id: i32,
    activity_ids: Vec<i32>,
) -> CreateOrganizationDto {
    CreateOrganizationDto {
        name: name.to_string(),
        building_id,
        phone_numbers: vec!["2-222-222".to_string(), "3-333-333".to_string()],
        activity_ids,
    }
}
