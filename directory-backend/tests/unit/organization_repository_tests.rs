// tests/unit/organization_repository_tests.rs
use directory_backend::api::dto::organization_query_dto::RectangleSearchQuery;
use directory_backend::error::AppError;
use directory_backend::repository::organization_repository::{
    OrganizationFilter, OrganizationRepository,
};
use directory_backend::service::organization_service::OrganizationService;

use crate::common;
use crate::common::test_data::{create_organization_dto, RED_SQUARE};

#[tokio::test]
async fn test_radius_is_reflexive_at_distance_zero() {
    let db = common::db::TestDatabase::new().await;
    let center = common::test_data::create_center_building(&db.connection).await;
    let service = OrganizationService::new(db.connection.clone());
    let created = service
        .create(create_organization_dto("Horns and Hooves", center.id, vec![]))
        .await
        .unwrap();

    let repo = OrganizationRepository::new(db.connection.clone());
    for radius_km in [0.0000001, 0.01, 1000.0] {
        let found = repo
            .find_within_radius(RED_SQUARE.0, RED_SQUARE.1, radius_km)
            .await
            .unwrap();
        assert_eq!(found.len(), 1, "radius {}", radius_km);
        assert_eq!(found[0].id(), created.id);
        assert_eq!(found[0].building.id, center.id);
    }
}

#[tokio::test]
async fn test_radius_excludes_far_building() {
    let db = common::db::TestDatabase::new().await;
    let center = common::test_data::create_center_building(&db.connection).await;
    let far = common::test_data::create_far_building(&db.connection).await;
    let service = OrganizationService::new(db.connection.clone());
    let near_org = service
        .create(create_organization_dto("Near", center.id, vec![]))
        .await
        .unwrap();
    let far_org = service
        .create(create_organization_dto("Far", far.id, vec![]))
        .await
        .unwrap();

    let repo = OrganizationRepository::new(db.connection.clone());

    let near_only = repo
        .find_within_radius(RED_SQUARE.0, RED_SQUARE.1, 4.0)
        .await
        .unwrap();
    assert_eq!(near_only.len(), 1);
    assert_eq!(near_only[0].id(), near_org.id);

    let both = repo
        .find_within_radius(RED_SQUARE.0, RED_SQUARE.1, 6.0)
        .await
        .unwrap();
    let ids: Vec<i32> = both.iter().map(|o| o.id()).collect();
    assert_eq!(ids, vec![near_org.id, far_org.id]);
}

#[tokio::test]
async fn test_radius_with_no_buildings_nearby_is_empty() {
    let db = common::db::TestDatabase::new().await;
    let far = common::test_data::create_far_building(&db.connection).await;
    OrganizationService::new(db.connection.clone())
        .create(create_organization_dto("Far", far.id, vec![]))
        .await
        .unwrap();

    let found = OrganizationRepository::new(db.connection.clone())
        .find_within_radius(RED_SQUARE.0, RED_SQUARE.1, 0.0000001)
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_rectangle_bounds_are_inclusive() {
    let db = common::db::TestDatabase::new().await;
    let center = common::test_data::create_center_building(&db.connection).await;
    let far = common::test_data::create_far_building(&db.connection).await;
    let service = OrganizationService::new(db.connection.clone());
    let near_org = service
        .create(create_organization_dto("Near", center.id, vec![]))
        .await
        .unwrap();
    service
        .create(create_organization_dto("Far", far.id, vec![]))
        .await
        .unwrap();

    let repo = OrganizationRepository::new(db.connection.clone());

    // 境界ちょうどの建物も含まれる
    let exact = repo
        .find_within_rectangle(&RectangleSearchQuery {
            min_lat: center.latitude,
            max_lat: center.latitude,
            min_lon: center.longitude,
            max_lon: center.longitude,
        })
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].id(), near_org.id);

    let both = repo
        .find_within_rectangle(&RectangleSearchQuery {
            min_lat: 55.0,
            max_lat: 56.0,
            min_lon: 37.0,
            max_lon: 38.0,
        })
        .await
        .unwrap();
    assert_eq!(both.len(), 2);

    let none = repo
        .find_within_rectangle(&RectangleSearchQuery {
            min_lat: 10.0,
            max_lat: 11.0,
            min_lon: 10.0,
            max_lon: 11.0,
        })
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_geo_and_activity_searches_never_duplicate() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let center = common::test_data::create_center_building(&db.connection).await;
    let service = OrganizationService::new(db.connection.clone());
    let organization = service
        .create(create_organization_dto(
            "AutoWorld",
            center.id,
            vec![forest.passenger.id, forest.parts.id, forest.accessories.id],
        ))
        .await
        .unwrap();

    let repo = OrganizationRepository::new(db.connection.clone());

    let by_activities = repo
        .find_by_activity_ids(&[forest.passenger.id, forest.parts.id, forest.accessories.id])
        .await
        .unwrap();
    assert_eq!(by_activities.len(), 1);

    let by_radius = repo
        .find_within_radius(RED_SQUARE.0, RED_SQUARE.1, 1.0)
        .await
        .unwrap();
    assert_eq!(by_radius.len(), 1);

    let by_rectangle = repo
        .find_within_rectangle(&RectangleSearchQuery {
            min_lat: 55.0,
            max_lat: 56.0,
            min_lon: 37.0,
            max_lon: 38.0,
        })
        .await
        .unwrap();
    assert_eq!(by_rectangle.len(), 1);
    assert_eq!(by_rectangle[0].id(), organization.id);
    assert_eq!(by_rectangle[0].activities.len(), 3);
}

#[tokio::test]
async fn test_find_all_combines_filters() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let center = common::test_data::create_center_building(&db.connection).await;
    let far = common::test_data::create_far_building(&db.connection).await;
    let service = OrganizationService::new(db.connection.clone());

    let horns = service
        .create(create_organization_dto(
            "Horns and Hooves",
            center.id,
            vec![forest.meat.id, forest.dairy.id],
        ))
        .await
        .unwrap();
    let meat_house = service
        .create(create_organization_dto("Meat House", far.id, vec![forest.meat.id]))
        .await
        .unwrap();

    let repo = OrganizationRepository::new(db.connection.clone());

    let all = repo.find_all(&OrganizationFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let by_building = repo
        .find_all(&OrganizationFilter {
            building_id: Some(far.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_building.len(), 1);
    assert_eq!(by_building[0].id(), meat_house.id);

    let by_name = repo
        .find_all(&OrganizationFilter {
            name: Some("hOrNs".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id(), horns.id);

    let by_activity = repo
        .find_all(&OrganizationFilter {
            activity_id: Some(forest.meat.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_activity.len(), 2);

    let meat_in_center = repo
        .find_all(&OrganizationFilter {
            activity_id: Some(forest.meat.id),
            building_id: Some(center.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(meat_in_center.len(), 1);
    assert_eq!(meat_in_center[0].id(), horns.id);

    let no_match = repo
        .find_all(&OrganizationFilter {
            activity_id: Some(forest.dairy.id),
            building_id: Some(far.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(no_match.is_empty());

    let by_activity_name = repo
        .find_all(&OrganizationFilter {
            activity_name: Some("DAIRY".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_activity_name.len(), 1);
    assert_eq!(by_activity_name[0].id(), horns.id);

    let empty_set = repo.find_by_activity_ids(&[]).await.unwrap();
    assert!(empty_set.is_empty());
}

#[tokio::test]
async fn test_hydration_includes_building_activities_and_children() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let center = common::test_data::create_center_building(&db.connection).await;
    let service = OrganizationService::new(db.connection.clone());
    let created = service
        .create(create_organization_dto(
            "AutoWorld",
            center.id,
            vec![forest.parts.id, forest.passenger.id],
        ))
        .await
        .unwrap();

    let aggregate = OrganizationRepository::new(db.connection.clone())
        .get_by_id(created.id)
        .await
        .unwrap();

    assert_eq!(aggregate.building, center);
    assert_eq!(aggregate.organization.phone_numbers.len(), 2);
    // 活動は ID 昇順
    assert_eq!(
        aggregate.activity_ids(),
        vec![forest.passenger.id, forest.parts.id]
    );
    let passenger = &aggregate.activities[0];
    let child_ids: Vec<i32> = passenger.children.iter().map(|c| c.id).collect();
    assert_eq!(child_ids, vec![forest.parts.id, forest.accessories.id]);
    assert!(aggregate.activities[1].children.is_empty());
}

#[tokio::test]
async fn test_get_missing_organization_is_not_found() {
    let db = common::db::TestDatabase::new().await;
    let repo = OrganizationRepository::new(db.connection.clone());

    match repo.get_by_id(12345).await {
        Err(AppError::NotFound(message)) => {
            assert_eq!(message, "Organization with id 12345 not found")
        }
        other => panic!("expected not found, got {:?}", other),
    }
}
