// tests/unit/activity_repository_tests.rs
use directory_backend::api::dto::activity_dto::{CreateActivityDto, UpdateActivityDto};
use directory_backend::error::AppError;
use directory_backend::repository::activity_repository::ActivityRepository;
use std::collections::BTreeSet;

use crate::common;
use crate::common::test_data::create_activity_dto;

#[tokio::test]
async fn test_create_derives_level_from_parent() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;

    assert_eq!(forest.food.level, 1);
    assert_eq!(forest.food.parent_id, None);
    assert_eq!(forest.meat.level, 2);
    assert_eq!(forest.meat.parent_id, Some(forest.food.id));
    assert_eq!(forest.parts.level, 3);
    assert_eq!(forest.parts.parent_id, Some(forest.passenger.id));
}

#[tokio::test]
async fn test_create_with_level_four_fails() {
    let db = common::db::TestDatabase::new().await;
    let repo = ActivityRepository::new(db.connection.clone());

    let result = repo
        .create(CreateActivityDto {
            name: "Too deep".to_string(),
            parent_id: None,
            level: Some(4),
        })
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert!(repo.find_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_under_level_three_parent_fails() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    let result = repo
        .create(create_activity_dto("Tyres", Some(forest.parts.id)))
        .await;

    match result {
        Err(AppError::ValidationError(message)) => assert!(message.contains("level 3")),
        other => panic!("expected validation error, got {:?}", other),
    }
    let children = repo.find_child_ids(forest.parts.id).await.unwrap();
    assert!(children.is_empty());
}

#[tokio::test]
async fn test_create_with_missing_parent_fails() {
    let db = common::db::TestDatabase::new().await;
    let repo = ActivityRepository::new(db.connection.clone());

    let result = repo.create(create_activity_dto("Orphan", Some(9999))).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_subtree_contains_root_and_all_descendants() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    let ids = repo.get_activity_subtree_ids(forest.cars.id).await.unwrap();
    let unique: BTreeSet<i32> = ids.iter().copied().collect();

    assert_eq!(ids.len(), unique.len(), "no duplicates");
    assert_eq!(
        unique,
        BTreeSet::from([
            forest.cars.id,
            forest.trucks.id,
            forest.passenger.id,
            forest.parts.id,
            forest.accessories.id,
        ])
    );

    let leaf = repo.get_activity_subtree_ids(forest.dairy.id).await.unwrap();
    assert_eq!(leaf, vec![forest.dairy.id]);
}

#[tokio::test]
async fn test_find_child_ids_and_filter_by_parent() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    let child_ids = repo.find_child_ids(forest.food.id).await.unwrap();
    assert_eq!(child_ids, vec![forest.meat.id, forest.dairy.id]);

    let children = repo.find_all(Some(forest.passenger.id)).await.unwrap();
    let names: Vec<&str> = children.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Spare parts", "Accessories"]);
}

#[tokio::test]
async fn test_find_ids_by_name_is_case_insensitive() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    let ids = repo.find_ids_by_name("PRODUCTS").await.unwrap();
    assert_eq!(ids, vec![forest.meat.id, forest.dairy.id]);

    assert!(repo.find_ids_by_name("100%").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_cannot_make_cycle() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    let onto_self = repo
        .update(
            forest.food.id,
            UpdateActivityDto {
                parent_id: Some(Some(forest.food.id)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(onto_self, Err(AppError::ValidationError(_))));

    let onto_child = repo
        .update(
            forest.food.id,
            UpdateActivityDto {
                parent_id: Some(Some(forest.meat.id)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(onto_child, Err(AppError::ValidationError(_))));

    let unchanged = repo.get_by_id(forest.food.id).await.unwrap();
    assert_eq!(unchanged.parent_id, None);
}

#[tokio::test]
async fn test_update_revalidates_level_and_parent() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    // レベル3の下には移せない
    let under_leaf = repo
        .update(
            forest.trucks.id,
            UpdateActivityDto {
                parent_id: Some(Some(forest.accessories.id)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(under_leaf, Err(AppError::ValidationError(_))));

    // 子を持つ活動はレベル3にできない
    let too_deep = repo
        .update(
            forest.passenger.id,
            UpdateActivityDto {
                level: Some(3),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(too_deep, Err(AppError::ValidationError(_))));

    // 付け替えるとレベルは新しい親に合わせて変わる
    let moved = repo
        .update(
            forest.trucks.id,
            UpdateActivityDto {
                parent_id: Some(Some(forest.passenger.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(forest.passenger.id));
    assert_eq!(moved.level, 3);

    // ルートへ戻す
    let detached = repo
        .update(
            forest.trucks.id,
            UpdateActivityDto {
                parent_id: Some(None),
                name: Some("Trucks and buses".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(detached.parent_id, None);
    assert_eq!(detached.level, 1);
    assert_eq!(detached.name, "Trucks and buses");
}

#[tokio::test]
async fn test_delete_cascades_to_children() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    repo.delete(forest.cars.id).await.unwrap();

    for id in [forest.trucks.id, forest.passenger.id, forest.parts.id] {
        assert!(matches!(repo.get_by_id(id).await, Err(AppError::NotFound(_))));
    }
    assert!(repo.get_by_id(forest.food.id).await.is_ok());

    let again = repo.delete(forest.cars.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_moving_subtree_that_would_exceed_depth_fails() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    // Cars の下には2階層ある。Food の下に移すとレベル4ができる
    let result = repo
        .update(
            forest.cars.id,
            UpdateActivityDto {
                parent_id: Some(Some(forest.food.id)),
                ..Default::default()
            },
        )
        .await;
    match result {
        Err(AppError::ValidationError(message)) => assert!(message.contains("level 4")),
        other => panic!("expected validation error, got {:?}", other),
    }

    let cars = repo.get_by_id(forest.cars.id).await.unwrap();
    assert_eq!((cars.level, cars.parent_id), (1, None));
    let parts = repo.get_by_id(forest.parts.id).await.unwrap();
    assert_eq!(parts.level, 3);

    // 子を1階層持つ Passenger も Meat の下（レベル3）には置けない
    let result = repo
        .update(
            forest.passenger.id,
            UpdateActivityDto {
                parent_id: Some(Some(forest.meat.id)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_explicit_level_must_match_parent() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    // Cars の子のまま レベル1 にはできない
    let result = repo
        .update(
            forest.trucks.id,
            UpdateActivityDto {
                level: Some(1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
    let trucks = repo.get_by_id(forest.trucks.id).await.unwrap();
    assert_eq!((trucks.level, trucks.parent_id), (2, Some(forest.cars.id)));

    // 子と孫を足しても深さは3まで
    let child = repo
        .create(create_activity_dto("Heavy trucks", Some(forest.trucks.id)))
        .await
        .unwrap();
    assert_eq!(child.level, 3);
    let grandchild = repo
        .create(create_activity_dto("Mining trucks", Some(child.id)))
        .await;
    assert!(matches!(grandchild, Err(AppError::ValidationError(_))));

    // 作成時も同じ
    let mismatched = repo
        .create(CreateActivityDto {
            name: "Cheese".to_string(),
            parent_id: Some(forest.food.id),
            level: Some(1),
        })
        .await;
    assert!(matches!(mismatched, Err(AppError::ValidationError(_))));

    let matching = repo
        .create(CreateActivityDto {
            name: "Cheese".to_string(),
            parent_id: Some(forest.food.id),
            level: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(matching.level, 2);
}

#[tokio::test]
async fn test_moving_subtree_relevels_descendants() {
    let db = common::db::TestDatabase::new().await;
    let forest = common::test_data::create_activity_forest(&db.connection).await;
    let repo = ActivityRepository::new(db.connection.clone());

    let detached = repo
        .update(
            forest.passenger.id,
            UpdateActivityDto {
                parent_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(detached.level, 1);
    for id in [forest.parts.id, forest.accessories.id] {
        let child = repo.get_by_id(id).await.unwrap();
        assert_eq!(child.level, 2);
        assert_eq!(child.parent_id, Some(forest.passenger.id));
    }

    // レベル2になったので、その子の下にもう1階層作れる
    let tyres = repo
        .create(create_activity_dto("Tyres", Some(forest.parts.id)))
        .await
        .unwrap();
    assert_eq!(tyres.level, 3);

    // 3階層になったサブツリーは別の木の下へは移せない
    let result = repo
        .update(
            forest.passenger.id,
            UpdateActivityDto {
                parent_id: Some(Some(forest.food.id)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    repo.delete(tyres.id).await.unwrap();
    let moved = repo
        .update(
            forest.passenger.id,
            UpdateActivityDto {
                parent_id: Some(Some(forest.food.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!((moved.level, moved.parent_id), (2, Some(forest.food.id)));
    let parts = repo.get_by_id(forest.parts.id).await.unwrap();
    assert_eq!(parts.level, 3);
}
