// src/repository/activity_repository.rs
use crate::api::dto::activity_dto::{CreateActivityDto, UpdateActivityDto};
use crate::domain::activity_model::{
    self, resolve_level, validate_activity_parent, validate_reparent, validate_subtree_depth,
    ActiveModel as ActivityActiveModel, Column as ActivityColumn, Entity as ActivityEntity,
};
use crate::domain::activity_tree::{
    collect_subtree_depths, collect_subtree_ids, max_depth, ActivityChildLookup,
};
use crate::error::AppResult;
use crate::repository::crud_repository::CrudRepository;
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct ActivityRepository {
    db: DbConn,
    crud: CrudRepository<ActivityEntity>,
}

impl ActivityRepository {
    pub fn new(db: DbConn) -> Self {
        Self {
            crud: CrudRepository::new(db.clone(), "Activity"),
            db,
        }
    }

    /// 活動を作成。レベルと親の検証を通ったものだけ書き込む
    pub async fn create(&self, payload: CreateActivityDto) -> AppResult<activity_model::Model> {
        let txn = self.db.begin().await?;

        let parent_level = match payload.parent_id {
            Some(parent_id) => parent_level_of(&txn, parent_id).await?,
            None => None,
        };
        let parent_id = validate_activity_parent(payload.parent_id, |_| parent_level)?;
        let level = resolve_level(payload.level, parent_level)?;

        let activity = self
            .crud
            .add_one_in(
                &txn,
                ActivityActiveModel {
                    name: Set(payload.name.trim().to_string()),
                    level: Set(level),
                    parent_id: Set(parent_id),
                    ..Default::default()
                },
            )
            .await?;

        txn.commit().await?;

        info!(activity_id = activity.id, level, parent_id = ?parent_id, "Activity created");
        Ok(activity)
    }

    /// 部分更新。親やレベルに触れない更新でも、結果の状態を検証し直す
    ///
    /// レベルは常に新しい親から導き、サブツリー全体がレベル3に収まることを確認する。
    /// レベルが変わったときは子孫のレベルも同じトランザクションで付け直す。
    pub async fn update(
        &self,
        id: i32,
        payload: UpdateActivityDto,
    ) -> AppResult<activity_model::Model> {
        let txn = self.db.begin().await?;
        let existing = self.crud.get_by_id_in(&txn, id).await?;

        let parent_id = payload.parent_id.unwrap_or(existing.parent_id);
        let subtree = collect_subtree_depths(&ChildLookupIn(&txn), id).await?;
        let subtree_ids: Vec<i32> = subtree.iter().map(|(node_id, _)| *node_id).collect();
        validate_reparent(id, parent_id, &subtree_ids)?;

        let parent_level = match parent_id {
            Some(pid) => parent_level_of(&txn, pid).await?,
            None => None,
        };
        let parent_id = validate_activity_parent(parent_id, |_| parent_level)?;
        let level = resolve_level(payload.level, parent_level)?;
        validate_subtree_depth(id, level, max_depth(&subtree))?;

        let mut active = ActivityActiveModel::default();
        if let Some(name) = payload.name {
            active.name = Set(name.trim().to_string());
        }
        if level != existing.level {
            active.level = Set(level);
        }
        if parent_id != existing.parent_id {
            active.parent_id = Set(parent_id);
        }

        let updated = self.crud.change_one_in(&txn, id, active).await?;
        if level != existing.level {
            relevel_descendants(&txn, level, &subtree).await?;
        }
        txn.commit().await?;

        debug!(
            activity_id = id,
            level,
            parent_id = ?parent_id,
            subtree_size = subtree.len(),
            "Activity updated"
        );
        Ok(updated)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<activity_model::Model> {
        self.crud.get_by_id(id).await
    }

    /// 親IDで絞り込み（省略時は全件）
    pub async fn find_all(&self, parent_id: Option<i32>) -> AppResult<Vec<activity_model::Model>> {
        self.crud
            .find_all(vec![(ActivityColumn::ParentId, parent_id.map(Into::into))])
            .await
    }

    /// 直下の子のID
    pub async fn find_child_ids(&self, parent_id: i32) -> AppResult<Vec<i32>> {
        child_ids_in(&self.db, parent_id).await
    }

    /// 名前の部分一致（大文字小文字を区別しない）で活動IDを探す
    pub async fn find_ids_by_name(&self, fragment: &str) -> AppResult<Vec<i32>> {
        let ids = ActivityEntity::find()
            .select_only()
            .column(ActivityColumn::Id)
            .filter(
                Expr::expr(Func::lower(Expr::col((ActivityEntity, ActivityColumn::Name))))
                    .like(contains_pattern(fragment)),
            )
            .order_by_asc(ActivityColumn::Id)
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    /// `root_id` 自身と全子孫のID（順不同）
    pub async fn get_activity_subtree_ids(&self, root_id: i32) -> AppResult<Vec<i32>> {
        let ids = collect_subtree_ids(self, root_id).await?;
        debug!(activity_id = root_id, count = ids.len(), "Activity subtree resolved");
        Ok(ids)
    }

    /// 削除。子孫と組織との関連も CASCADE で消える
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.crud.remove_one(id).await?;
        info!(activity_id = id, "Activity deleted");
        Ok(())
    }
}

#[async_trait]
impl ActivityChildLookup for ActivityRepository {
    async fn child_ids(&self, parent_id: i32) -> AppResult<Vec<i32>> {
        self.find_child_ids(parent_id).await
    }
}

// トランザクション内でサブツリーを辿るためのラッパー
struct ChildLookupIn<'a, C>(&'a C);

#[async_trait]
impl<'a, C> ActivityChildLookup for ChildLookupIn<'a, C>
where
    C: ConnectionTrait,
{
    async fn child_ids(&self, parent_id: i32) -> AppResult<Vec<i32>> {
        child_ids_in(self.0, parent_id).await
    }
}

async fn child_ids_in<C>(conn: &C, parent_id: i32) -> AppResult<Vec<i32>>
where
    C: ConnectionTrait,
{
    let ids = ActivityEntity::find()
        .select_only()
        .column(ActivityColumn::Id)
        .filter(ActivityColumn::ParentId.eq(parent_id))
        .order_by_asc(ActivityColumn::Id)
        .into_tuple::<i32>()
        .all(conn)
        .await?;
    Ok(ids)
}

// 根が `root_level` になったサブツリーの子孫に、深さに応じたレベルを付け直す
async fn relevel_descendants<C>(
    conn: &C,
    root_level: i32,
    subtree: &[(i32, i32)],
) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let mut ids_by_depth: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    for &(node_id, depth) in subtree.iter().filter(|(_, depth)| *depth > 0) {
        ids_by_depth.entry(depth).or_default().push(node_id);
    }

    for (depth, ids) in ids_by_depth {
        let result = ActivityEntity::update_many()
            .col_expr(ActivityColumn::Level, Expr::value(root_level + depth))
            .filter(ActivityColumn::Id.is_in(ids))
            .exec(conn)
            .await?;
        debug!(
            level = root_level + depth,
            rows = result.rows_affected,
            "Descendant levels updated"
        );
    }
    Ok(())
}

async fn parent_level_of<C>(conn: &C, parent_id: i32) -> AppResult<Option<i32>>
where
    C: ConnectionTrait,
{
    let level = ActivityEntity::find_by_id(parent_id)
        .select_only()
        .column(ActivityColumn::Level)
        .into_tuple::<i32>()
        .one(conn)
        .await?;
    Ok(level)
}

/// LIKE 用の部分一致パターン（小文字化済み、ワイルドカードはエスケープ）
pub(crate) fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
