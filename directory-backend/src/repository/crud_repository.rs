// src/repository/crud_repository.rs

//! エンティティ共通の CRUD 基盤
//!
//! 主キーが単一の `i32` であるエンティティに対して、追加・取得・一覧・
//! 部分更新・削除を提供する。書き込み時のストレージエラーはここで一度だけ
//! ドメインのエラー種別に分類する。

use crate::error::AppResult;
use crate::utils::error_helper::{classify_write_error, not_found_error};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr,
    EntityTrait, IntoActiveModel, Iterable, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter,
    QueryOrder, Value,
};
use std::marker::PhantomData;
use tracing::debug;

/// 等価比較のみの汎用フィルタ。値が `None` の条件は無視する
pub type EqFilter<E> = (<E as EntityTrait>::Column, Option<Value>);

pub struct CrudRepository<E> {
    db: DbConn,
    // エラーメッセージ用のリソース名 ("Organization" など)
    resource: &'static str,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CrudRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            resource: self.resource,
            _entity: PhantomData,
        }
    }
}

impl<E> CrudRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    pub fn new(db: DbConn, resource: &'static str) -> Self {
        Self {
            db,
            resource,
            _entity: PhantomData,
        }
    }

    /// 追加。一意制約違反は `AlreadyExists`
    pub async fn add_one(&self, data: E::ActiveModel) -> AppResult<E::Model> {
        self.add_one_in(&self.db, data).await
    }

    /// トランザクション内などの任意の接続で追加する
    pub async fn add_one_in<C>(&self, conn: &C, data: E::ActiveModel) -> AppResult<E::Model>
    where
        C: ConnectionTrait,
    {
        let model = data
            .insert(conn)
            .await
            .map_err(|e| classify_write_error(e, self.resource))?;
        debug!(resource = self.resource, "Row inserted");
        Ok(model)
    }

    /// 等価条件の AND で一覧を取得（主キー昇順）
    pub async fn find_all(&self, filters: Vec<EqFilter<E>>) -> AppResult<Vec<E::Model>> {
        let condition = filters
            .into_iter()
            .filter_map(|(column, value)| value.map(|v| column.eq(v)))
            .fold(Condition::all(), |condition, expr| condition.add(expr));

        let mut query = E::find().filter(condition);
        for key in E::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }

        Ok(query.all(&self.db).await?)
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<E::Model>> {
        self.find_by_id_in(&self.db, id).await
    }

    pub async fn find_by_id_in<C>(&self, conn: &C, id: i32) -> AppResult<Option<E::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(E::find_by_id(id).one(conn).await?)
    }

    /// ID で取得。存在しなければ `NotFound`
    pub async fn get_by_id(&self, id: i32) -> AppResult<E::Model> {
        self.get_by_id_in(&self.db, id).await
    }

    pub async fn get_by_id_in<C>(&self, conn: &C, id: i32) -> AppResult<E::Model>
    where
        C: ConnectionTrait,
    {
        self.find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| not_found_error(self.resource, id))
    }

    /// 部分更新。`Set` されたフィールドのみ書き換える
    pub async fn change_one(&self, id: i32, data: E::ActiveModel) -> AppResult<E::Model> {
        self.change_one_in(&self.db, id, data).await
    }

    pub async fn change_one_in<C>(
        &self,
        conn: &C,
        id: i32,
        mut data: E::ActiveModel,
    ) -> AppResult<E::Model>
    where
        C: ConnectionTrait,
    {
        let existing = self.get_by_id_in(conn, id).await?;
        if !data.is_changed() {
            return Ok(existing);
        }

        for key in E::PrimaryKey::iter() {
            data.set(key.into_column(), id.into());
        }

        match data.update(conn).await {
            Ok(model) => {
                debug!(resource = self.resource, id, "Row updated");
                Ok(model)
            }
            // 取得と更新の間に削除された
            Err(DbErr::RecordNotUpdated) => Err(not_found_error(self.resource, id)),
            Err(e) => Err(classify_write_error(e, self.resource)),
        }
    }

    /// 削除。対象が無ければ `NotFound`
    pub async fn remove_one(&self, id: i32) -> AppResult<()> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(not_found_error(self.resource, id));
        }
        debug!(resource = self.resource, id, "Row deleted");
        Ok(())
    }
}
