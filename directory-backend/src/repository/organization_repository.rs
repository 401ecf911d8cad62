// src/repository/organization_repository.rs

//! 組織の検索・読み込み
//!
//! 検索はまず条件に合う組織行だけを取り、建物・活動・活動の子はそれぞれ
//! IN 句でまとめて引いて組み立てる（行数に比例したクエリは発行しない）。
//! 読み取りは REPEATABLE READ の読み取り専用トランザクション内で行う。

use crate::api::dto::organization_dto::{CreateOrganizationDto, UpdateOrganizationDto};
use crate::api::dto::organization_query_dto::RectangleSearchQuery;
use crate::domain::activity_model::{
    self, Column as ActivityColumn, Entity as ActivityEntity,
};
use crate::domain::building_model::{
    self, Column as BuildingColumn, Entity as BuildingEntity,
};
use crate::domain::organization_activity_model::{
    ActiveModel as OrganizationActivityActiveModel, Column as OrganizationActivityColumn,
    Entity as OrganizationActivityEntity,
};
use crate::domain::organization_aggregate::{
    dedup_by_id, ActivityWithChildren, OrganizationAggregate,
};
use crate::domain::organization_model::{
    self, ActiveModel as OrganizationActiveModel, Column as OrganizationColumn,
    Entity as OrganizationEntity,
};
use crate::error::{AppError, AppResult};
use crate::repository::activity_repository::contains_pattern;
use crate::repository::crud_repository::CrudRepository;
use crate::utils::error_helper::{classify_write_error, not_found_error};
use crate::utils::geo::{is_within_radius, latitude_window};
use sea_orm::sea_query::{Expr, Func, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    AccessMode, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, DbConn,
    EntityTrait, IsolationLevel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, error, warn};

/// 組織一覧の絞り込み条件。すべて AND で結合し、未指定の条件は無視する
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationFilter {
    pub building_id: Option<i32>,
    /// 名前の部分一致（大文字小文字を区別しない）
    pub name: Option<String>,
    /// この活動が直接付いている組織
    pub activity_id: Option<i32>,
    /// 名前が部分一致する活動が付いている組織
    pub activity_name: Option<String>,
    /// 各集合のいずれかの活動が付いている組織（集合同士は AND）
    pub activity_sets: Vec<Vec<i32>>,
}

impl OrganizationFilter {
    pub fn by_activity_ids(activity_ids: &[i32]) -> Self {
        Self {
            activity_sets: vec![activity_ids.to_vec()],
            ..Default::default()
        }
    }

    /// 活動IDの集合1つだけを条件とする場合、その集合
    pub fn activity_ids_only(&self) -> Option<&[i32]> {
        match self.activity_sets.as_slice() {
            [activity_ids]
                if self.building_id.is_none()
                    && self.activity_id.is_none()
                    && non_blank(self.name.as_deref()).is_none()
                    && non_blank(self.activity_name.as_deref()).is_none() =>
            {
                Some(activity_ids)
            }
            _ => None,
        }
    }

    // 空の活動集合はどの組織にも一致しない
    fn matches_nothing(&self) -> bool {
        self.activity_sets.iter().any(Vec::is_empty)
    }

    fn to_condition(&self) -> Condition {
        let mut conditions = Condition::all();

        if let Some(building_id) = self.building_id {
            conditions = conditions.add(OrganizationColumn::BuildingId.eq(building_id));
        }

        if let Some(name) = non_blank(self.name.as_deref()) {
            conditions = conditions.add(lower_like(
                Expr::col((OrganizationEntity, OrganizationColumn::Name)),
                name,
            ));
        }

        if let Some(activity_id) = self.activity_id {
            conditions = conditions.add(member_of(
                OrganizationActivityColumn::ActivityId.eq(activity_id),
            ));
        }

        if let Some(activity_name) = non_blank(self.activity_name.as_deref()) {
            let matching = Query::select()
                .column(ActivityColumn::Id)
                .from(ActivityEntity)
                .and_where(lower_like(
                    Expr::col((ActivityEntity, ActivityColumn::Name)),
                    activity_name,
                ))
                .to_owned();
            conditions = conditions.add(member_of(
                OrganizationActivityColumn::ActivityId.in_subquery(matching),
            ));
        }

        for activity_ids in &self.activity_sets {
            conditions = conditions.add(member_of(
                OrganizationActivityColumn::ActivityId.is_in(activity_ids.iter().copied()),
            ));
        }

        conditions
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn lower_like(column: Expr, fragment: &str) -> SimpleExpr {
    Expr::expr(Func::lower(column)).like(contains_pattern(fragment))
}

// 中間テーブルで活動条件に合う組織IDのサブクエリ。
// JOIN ではなく IN にしているので、複数の活動で一致しても行は重複しない
fn member_of(activity_condition: SimpleExpr) -> SimpleExpr {
    let organization_ids: SelectStatement = Query::select()
        .column(OrganizationActivityColumn::OrganizationId)
        .from(OrganizationActivityEntity)
        .and_where(activity_condition)
        .to_owned();
    OrganizationColumn::Id.in_subquery(organization_ids)
}

pub struct OrganizationRepository {
    db: DbConn,
    crud: CrudRepository<OrganizationEntity>,
}

impl OrganizationRepository {
    pub fn new(db: DbConn) -> Self {
        Self {
            crud: CrudRepository::new(db.clone(), "Organization"),
            db,
        }
    }

    async fn read_snapshot(&self) -> AppResult<DatabaseTransaction> {
        Ok(self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await?)
    }

    // --- 検索 ---

    pub async fn find_all(
        &self,
        filter: &OrganizationFilter,
    ) -> AppResult<Vec<OrganizationAggregate>> {
        if filter.matches_nothing() {
            debug!("Empty activity set, skipping organization query");
            return Ok(Vec::new());
        }

        let txn = self.read_snapshot().await?;
        let organizations = OrganizationEntity::find()
            .filter(filter.to_condition())
            .order_by_asc(OrganizationColumn::Id)
            .all(&txn)
            .await?;
        let result = hydrate(&txn, organizations).await?;
        txn.commit().await?;

        debug!(count = result.len(), "Organizations listed");
        Ok(result)
    }

    /// いずれかの活動が付いている組織（サブツリー展開後の検索用）
    pub async fn find_by_activity_ids(
        &self,
        activity_ids: &[i32],
    ) -> AppResult<Vec<OrganizationAggregate>> {
        self.find_all(&OrganizationFilter::by_activity_ids(activity_ids))
            .await
    }

    /// 建物が中心から `radius_km` 以内にある組織
    ///
    /// 緯度の範囲で建物を SQL 側で粗く絞り、正確な距離はここで計算する。
    pub async fn find_within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> AppResult<Vec<OrganizationAggregate>> {
        let txn = self.read_snapshot().await?;

        let (min_lat, max_lat) = latitude_window(latitude, radius_km);
        let candidates = BuildingEntity::find()
            .filter(BuildingColumn::Latitude.between(min_lat, max_lat))
            .all(&txn)
            .await?;
        let candidate_count = candidates.len();

        let building_ids: Vec<i32> = candidates
            .into_iter()
            .filter(|b| is_within_radius(latitude, longitude, radius_km, b.latitude, b.longitude))
            .map(|b| b.id)
            .collect();

        let organizations = if building_ids.is_empty() {
            Vec::new()
        } else {
            OrganizationEntity::find()
                .filter(OrganizationColumn::BuildingId.is_in(building_ids))
                .order_by_asc(OrganizationColumn::Id)
                .all(&txn)
                .await?
        };
        let result = hydrate(&txn, organizations).await?;
        txn.commit().await?;

        debug!(
            latitude,
            longitude,
            radius_km,
            candidate_count,
            count = result.len(),
            "Radius search finished"
        );
        Ok(result)
    }

    /// 建物の座標が矩形内（境界を含む）にある組織
    pub async fn find_within_rectangle(
        &self,
        bounds: &RectangleSearchQuery,
    ) -> AppResult<Vec<OrganizationAggregate>> {
        let buildings_in_rectangle = Query::select()
            .column(BuildingColumn::Id)
            .from(BuildingEntity)
            .and_where(BuildingColumn::Latitude.between(bounds.min_lat, bounds.max_lat))
            .and_where(BuildingColumn::Longitude.between(bounds.min_lon, bounds.max_lon))
            .to_owned();

        let txn = self.read_snapshot().await?;
        let organizations = OrganizationEntity::find()
            .filter(OrganizationColumn::BuildingId.in_subquery(buildings_in_rectangle))
            .order_by_asc(OrganizationColumn::Id)
            .all(&txn)
            .await?;
        let result = hydrate(&txn, organizations).await?;
        txn.commit().await?;

        debug!(count = result.len(), "Rectangle search finished");
        Ok(result)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<OrganizationAggregate> {
        let txn = self.read_snapshot().await?;
        let aggregate = self.get_by_id_in(&txn, id).await?;
        txn.commit().await?;
        Ok(aggregate)
    }

    pub async fn get_by_id_in<C>(&self, conn: &C, id: i32) -> AppResult<OrganizationAggregate>
    where
        C: ConnectionTrait,
    {
        let organization = self.crud.get_by_id_in(conn, id).await?;
        hydrate(conn, vec![organization])
            .await?
            .pop()
            .ok_or_else(|| not_found_error("Organization", id))
    }

    // --- 書き込み（呼び出し側のトランザクション内で使う） ---

    pub async fn ensure_building_exists<C>(&self, conn: &C, building_id: i32) -> AppResult<()>
    where
        C: ConnectionTrait,
    {
        let found = BuildingEntity::find_by_id(building_id)
            .select_only()
            .column(BuildingColumn::Id)
            .into_tuple::<i32>()
            .one(conn)
            .await?;
        match found {
            Some(_) => Ok(()),
            None => Err(not_found_error("Building", building_id)),
        }
    }

    pub async fn insert_row<C>(
        &self,
        conn: &C,
        payload: &CreateOrganizationDto,
    ) -> AppResult<organization_model::Model>
    where
        C: ConnectionTrait,
    {
        self.crud
            .add_one_in(
                conn,
                OrganizationActiveModel {
                    name: Set(payload.name.trim().to_string()),
                    building_id: Set(payload.building_id),
                    phone_numbers: Set(payload.phone_numbers.clone()),
                    ..Default::default()
                },
            )
            .await
    }

    /// 指定されたフィールドだけを更新する（activity_ids は扱わない）
    pub async fn update_row<C>(
        &self,
        conn: &C,
        id: i32,
        payload: &UpdateOrganizationDto,
    ) -> AppResult<organization_model::Model>
    where
        C: ConnectionTrait,
    {
        let mut active = OrganizationActiveModel::default();
        if let Some(name) = &payload.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(building_id) = payload.building_id {
            active.building_id = Set(building_id);
        }
        if let Some(phone_numbers) = &payload.phone_numbers {
            active.phone_numbers = Set(phone_numbers.clone());
        }

        self.crud.change_one_in(conn, id, active).await
    }

    /// 活動を関連付ける。存在しない活動IDが1つでもあれば何も書かずに `NotFound`
    pub async fn attach_activities<C>(
        &self,
        conn: &C,
        organization_id: i32,
        activity_ids: &[i32],
    ) -> AppResult<()>
    where
        C: ConnectionTrait,
    {
        let requested: BTreeSet<i32> = activity_ids.iter().copied().collect();
        if requested.is_empty() {
            return Ok(());
        }

        let found: BTreeSet<i32> = ActivityEntity::find()
            .select_only()
            .column(ActivityColumn::Id)
            .filter(ActivityColumn::Id.is_in(requested.iter().copied()))
            .into_tuple::<i32>()
            .all(conn)
            .await?
            .into_iter()
            .collect();

        let missing: Vec<i32> = requested.difference(&found).copied().collect();
        if !missing.is_empty() {
            warn!(organization_id, missing = ?missing, "Unknown activity ids");
            return Err(AppError::NotFound(format!(
                "Activities not found: {:?}",
                missing
            )));
        }

        let links = requested
            .into_iter()
            .map(|activity_id| OrganizationActivityActiveModel {
                organization_id: Set(organization_id),
                activity_id: Set(activity_id),
            });
        OrganizationActivityEntity::insert_many(links)
            .exec_without_returning(conn)
            .await
            .map_err(|e| classify_write_error(e, "Organization activity"))?;

        debug!(organization_id, count = found.len(), "Activities attached");
        Ok(())
    }

    /// 活動の集合を丸ごと置き換える（追加ではない）
    pub async fn replace_activities<C>(
        &self,
        conn: &C,
        organization_id: i32,
        activity_ids: &[i32],
    ) -> AppResult<()>
    where
        C: ConnectionTrait,
    {
        OrganizationActivityEntity::delete_many()
            .filter(OrganizationActivityColumn::OrganizationId.eq(organization_id))
            .exec(conn)
            .await?;
        self.attach_activities(conn, organization_id, activity_ids)
            .await
    }
}

/// 組織行に建物・活動・活動の直下の子を読み込む
///
/// 組織の順序は入力の順（重複は除く）、活動と子は ID 昇順。
async fn hydrate<C>(
    conn: &C,
    organizations: Vec<organization_model::Model>,
) -> AppResult<Vec<OrganizationAggregate>>
where
    C: ConnectionTrait,
{
    let organizations = dedup_by_id(organizations);
    if organizations.is_empty() {
        return Ok(Vec::new());
    }

    let building_ids: BTreeSet<i32> = organizations.iter().map(|o| o.building_id).collect();
    let buildings: HashMap<i32, building_model::Model> = BuildingEntity::find()
        .filter(BuildingColumn::Id.is_in(building_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    let organization_ids: Vec<i32> = organizations.iter().map(|o| o.id).collect();
    let links = OrganizationActivityEntity::find()
        .filter(OrganizationActivityColumn::OrganizationId.is_in(organization_ids))
        .all(conn)
        .await?;

    let mut activity_ids_by_organization: HashMap<i32, BTreeSet<i32>> = HashMap::new();
    for link in &links {
        activity_ids_by_organization
            .entry(link.organization_id)
            .or_default()
            .insert(link.activity_id);
    }
    let activity_ids: BTreeSet<i32> = links.iter().map(|l| l.activity_id).collect();

    let mut activities: HashMap<i32, activity_model::Model> = HashMap::new();
    let mut children: HashMap<i32, Vec<activity_model::Model>> = HashMap::new();
    if !activity_ids.is_empty() {
        activities = ActivityEntity::find()
            .filter(ActivityColumn::Id.is_in(activity_ids.iter().copied()))
            .all(conn)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let child_rows = ActivityEntity::find()
            .filter(ActivityColumn::ParentId.is_in(activity_ids.iter().copied()))
            .order_by_asc(ActivityColumn::Id)
            .all(conn)
            .await?;
        for child in child_rows {
            if let Some(parent_id) = child.parent_id {
                children.entry(parent_id).or_default().push(child);
            }
        }
    }

    let mut result = Vec::with_capacity(organizations.len());
    for organization in organizations {
        let Some(building) = buildings.get(&organization.building_id).cloned() else {
            // 外部キーがあるので同一スナップショット内では起こらない
            error!(
                organization_id = organization.id,
                building_id = organization.building_id,
                "Organization references a missing building"
            );
            return Err(AppError::InternalServerError(format!(
                "Building {} for organization {} is missing",
                organization.building_id, organization.id
            )));
        };

        let organization_activities = activity_ids_by_organization
            .get(&organization.id)
            .into_iter()
            .flatten()
            .filter_map(|id| activities.get(id))
            .map(|activity| ActivityWithChildren {
                activity: activity.clone(),
                children: children.get(&activity.id).cloned().unwrap_or_default(),
            })
            .collect();

        result.push(OrganizationAggregate {
            organization,
            building,
            activities: organization_activities,
        });
    }

    Ok(result)
}
