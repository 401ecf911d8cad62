// src/service/organization_service.rs

use crate::api::dto::organization_dto::{
    CreateOrganizationDto, OrganizationResponse, UpdateOrganizationDto,
};
use crate::api::dto::organization_query_dto::{
    OrganizationListQuery, RadiusSearchQuery, RectangleSearchQuery,
};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::repository::activity_repository::ActivityRepository;
use crate::repository::organization_repository::{OrganizationFilter, OrganizationRepository};
use sea_orm::TransactionTrait;
use std::collections::BTreeSet;
use std::sync::Arc;
use crate::log_with_context;
use tracing::debug;

pub struct OrganizationService {
    db: DbPool,
    repo: Arc<OrganizationRepository>,
    activity_repo: Arc<ActivityRepository>,
}

impl OrganizationService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            repo: Arc::new(OrganizationRepository::new(db_pool.clone())),
            activity_repo: Arc::new(ActivityRepository::new(db_pool.clone())),
            db: db_pool,
        }
    }

    // --- 検索 ---

    /// 一覧。`include_subactivities` 指定時は活動条件をサブツリーに広げる
    pub async fn list(&self, query: OrganizationListQuery) -> AppResult<Vec<OrganizationResponse>> {
        let filter = self.build_filter(&query).await?;

        let organizations = match filter.activity_ids_only() {
            Some(activity_ids) => self.repo.find_by_activity_ids(activity_ids).await?,
            None => self.repo.find_all(&filter).await?,
        };

        Ok(organizations.into_iter().map(Into::into).collect())
    }

    async fn build_filter(&self, query: &OrganizationListQuery) -> AppResult<OrganizationFilter> {
        let mut filter = OrganizationFilter {
            building_id: query.building_id,
            name: query.name_filter().map(str::to_string),
            ..Default::default()
        };

        match query.activity_id {
            Some(activity_id) if query.include_subactivities => {
                let subtree = self.activity_repo.get_activity_subtree_ids(activity_id).await?;
                filter.activity_sets.push(subtree);
            }
            activity_id => filter.activity_id = activity_id,
        }

        if let Some(search) = query.activity_search_filter() {
            if query.include_subactivities {
                let mut expanded = BTreeSet::new();
                for root_id in self.activity_repo.find_ids_by_name(search).await? {
                    expanded.extend(self.activity_repo.get_activity_subtree_ids(root_id).await?);
                }
                debug!(search, count = expanded.len(), "Activity search expanded");
                filter.activity_sets.push(expanded.into_iter().collect());
            } else {
                filter.activity_name = Some(search.to_string());
            }
        }

        Ok(filter)
    }

    pub async fn get(&self, id: i32) -> AppResult<OrganizationResponse> {
        let organization = self.repo.get_by_id(id).await?;
        Ok(organization.into())
    }

    pub async fn radius_search(
        &self,
        query: &RadiusSearchQuery,
    ) -> AppResult<Vec<OrganizationResponse>> {
        let organizations = self
            .repo
            .find_within_radius(query.latitude, query.longitude, query.radius_km)
            .await?;
        Ok(organizations.into_iter().map(Into::into).collect())
    }

    pub async fn rectangle_search(
        &self,
        bounds: &RectangleSearchQuery,
    ) -> AppResult<Vec<OrganizationResponse>> {
        let organizations = self.repo.find_within_rectangle(bounds).await?;
        Ok(organizations.into_iter().map(Into::into).collect())
    }

    // --- 書き込み ---

    /// 組織行と活動の関連付けを1トランザクションで作成する。
    /// どれか1つでも失敗すれば何も残らない
    pub async fn create(&self, payload: CreateOrganizationDto) -> AppResult<OrganizationResponse> {
        let txn = self.db.begin().await?;

        self.repo
            .ensure_building_exists(&txn, payload.building_id)
            .await?;
        let organization = self.repo.insert_row(&txn, &payload).await?;
        self.repo
            .attach_activities(&txn, organization.id, &payload.activity_ids)
            .await?;
        let created = self.repo.get_by_id_in(&txn, organization.id).await?;

        txn.commit().await?;

        log_with_context!(
            tracing::Level::INFO,
            "Organization created",
            organization_id => created.id(),
            activity_ids => created.activity_ids(),
        );
        Ok(created.into())
    }

    /// 部分更新。`activity_ids` があれば集合を置き換える
    pub async fn update(
        &self,
        id: i32,
        payload: UpdateOrganizationDto,
    ) -> AppResult<OrganizationResponse> {
        let txn = self.db.begin().await?;

        if let Some(building_id) = payload.building_id {
            self.repo.ensure_building_exists(&txn, building_id).await?;
        }
        // 行に変更が無くても存在確認は行われる
        self.repo.update_row(&txn, id, &payload).await?;
        if let Some(activity_ids) = &payload.activity_ids {
            self.repo.replace_activities(&txn, id, activity_ids).await?;
        }
        let updated = self.repo.get_by_id_in(&txn, id).await?;

        txn.commit().await?;

        log_with_context!(
            tracing::Level::INFO,
            "Organization updated",
            organization_id => id,
            row_changed => payload.touches_row(),
            activities_replaced => payload.activity_ids.is_some(),
        );
        Ok(updated.into())
    }
}
