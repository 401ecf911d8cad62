// src/repository/building_repository.rs
use crate::api::dto::building_dto::{CreateBuildingDto, UpdateBuildingDto};
use crate::domain::building_model::{
    self, ActiveModel as BuildingActiveModel, Column as BuildingColumn, Entity as BuildingEntity,
};
use crate::error::{AppError, AppResult};
use crate::repository::crud_repository::CrudRepository;
use sea_orm::{DbConn, Set};
use tracing::info;

pub struct BuildingRepository {
    crud: CrudRepository<BuildingEntity>,
}

impl BuildingRepository {
    pub fn new(db: DbConn) -> Self {
        Self {
            crud: CrudRepository::new(db, "Building"),
        }
    }

    /// 建物を作成。住所が重複していれば `AlreadyExists`
    pub async fn create(&self, payload: CreateBuildingDto) -> AppResult<building_model::Model> {
        let address = normalize_address(&payload.address)?;

        let building = self
            .crud
            .add_one(BuildingActiveModel {
                address: Set(address),
                latitude: Set(payload.latitude),
                longitude: Set(payload.longitude),
                ..Default::default()
            })
            .await?;

        info!(building_id = building.id, "Building created");
        Ok(building)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<building_model::Model> {
        self.crud.get_by_id(id).await
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<building_model::Model>> {
        self.crud.find_by_id(id).await
    }

    /// 住所の完全一致で絞り込み（省略時は全件）
    pub async fn find_all(&self, address: Option<String>) -> AppResult<Vec<building_model::Model>> {
        self.crud
            .find_all(vec![(BuildingColumn::Address, address.map(Into::into))])
            .await
    }

    pub async fn update(
        &self,
        id: i32,
        payload: UpdateBuildingDto,
    ) -> AppResult<building_model::Model> {
        let mut active = BuildingActiveModel::default();
        if let Some(address) = payload.address {
            active.address = Set(normalize_address(&address)?);
        }
        if let Some(latitude) = payload.latitude {
            active.latitude = Set(latitude);
        }
        if let Some(longitude) = payload.longitude {
            active.longitude = Set(longitude);
        }

        self.crud.change_one(id, active).await
    }

    /// 削除すると建物内の組織も CASCADE で消える
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.crud.remove_one(id).await?;
        info!(building_id = id, "Building deleted");
        Ok(())
    }
}

fn normalize_address(address: &str) -> AppResult<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            "Building address must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
