// tests/unit/building_repository_tests.rs
use directory_backend::api::dto::building_dto::UpdateBuildingDto;
use directory_backend::error::AppError;
use directory_backend::repository::building_repository::BuildingRepository;
use directory_backend::repository::organization_repository::OrganizationRepository;
use directory_backend::service::organization_service::OrganizationService;

use crate::common;
use crate::common::test_data::{create_building_dto, create_organization_dto};

#[tokio::test]
async fn test_duplicate_address_is_already_exists() {
    let db = common::db::TestDatabase::new().await;
    let repo = BuildingRepository::new(db.connection.clone());

    repo.create(create_building_dto("Moscow, Blyukhera st. 32/1", 55.751, 37.62))
        .await
        .unwrap();
    let duplicate = repo
        .create(create_building_dto("  Moscow, Blyukhera st. 32/1 ", 55.0, 37.0))
        .await;

    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));
    assert_eq!(repo.find_all(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_blank_address_is_rejected() {
    let db = common::db::TestDatabase::new().await;
    let repo = BuildingRepository::new(db.connection.clone());

    let result = repo.create(create_building_dto("   ", 55.0, 37.0)).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_get_missing_building_is_not_found() {
    let db = common::db::TestDatabase::new().await;
    let repo = BuildingRepository::new(db.connection.clone());

    let result = repo.get_by_id(404).await;
    match result {
        Err(AppError::NotFound(message)) => assert_eq!(message, "Building with id 404 not found"),
        other => panic!("expected not found, got {:?}", other),
    }
    assert!(repo.find_by_id(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_partial_update_and_address_filter() {
    let db = common::db::TestDatabase::new().await;
    let repo = BuildingRepository::new(db.connection.clone());
    let building = common::test_data::create_center_building(&db.connection).await;
    let other = common::test_data::create_far_building(&db.connection).await;

    let updated = repo
        .update(
            building.id,
            UpdateBuildingDto {
                latitude: Some(55.7),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.latitude, 55.7);
    assert_eq!(updated.longitude, building.longitude);
    assert_eq!(updated.address, building.address);

    let conflict = repo
        .update(
            building.id,
            UpdateBuildingDto {
                address: Some(other.address.clone()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(conflict, Err(AppError::AlreadyExists(_))));

    let found = repo.find_all(Some(other.address.clone())).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, other.id);

    let missing = repo.update(9999, UpdateBuildingDto::default()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_cascades_to_organizations() {
    let db = common::db::TestDatabase::new().await;
    let building = common::test_data::create_center_building(&db.connection).await;
    let service = OrganizationService::new(db.connection.clone());
    let organization = service
        .create(create_organization_dto("Horns and Hooves", building.id, vec![]))
        .await
        .unwrap();

    BuildingRepository::new(db.connection.clone())
        .delete(building.id)
        .await
        .unwrap();

    let result = OrganizationRepository::new(db.connection.clone())
        .get_by_id(organization.id)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
