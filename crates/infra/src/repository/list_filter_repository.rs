//! # ListFilterRepository
//!
//! 一覧画面ごとの表示設定（`list_filters` テーブル）を読み書きする。
//! `(tenant_id, user_id, entity)` で一意になる。

use async_trait::async_trait;
use catalog_domain::{
   filter::{ListFilter, ListFilterId, ListFilterRecord},
   tenant::TenantId,
   user::UserId,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{db::TxContext, error::InfraError};

/// 一覧フィルタ設定リポジトリトレイト
#[async_trait]
pub trait ListFilterRepository: Send + Sync {
   /// ユーザーと画面で設定を取得する
   async fn find_by_entity(
      &self,
      tenant_id: &TenantId,
      user_id: &UserId,
      entity: &str,
   ) -> Result<Option<ListFilter>, InfraError>;

   /// 設定を保存する
   ///
   /// 同じユーザー・画面の設定が既にあれば `data` と `updated_at` を置き換える。
   async fn upsert(&self, tx: &mut TxContext, filter: &ListFilter) -> Result<(), InfraError>;
}

#[derive(sqlx::FromRow)]
struct ListFilterRow {
   id:         Uuid,
   tenant_id:  Uuid,
   user_id:    Uuid,
   entity:     String,
   data:       Json<Value>,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl From<ListFilterRow> for ListFilter {
   fn from(row: ListFilterRow) -> Self {
      ListFilter::from_db(ListFilterRecord {
         id:         ListFilterId::from_uuid(row.id),
         tenant_id:  TenantId::from_uuid(row.tenant_id),
         user_id:    UserId::from_uuid(row.user_id),
         entity:     row.entity,
         data:       row.data.0,
         created_at: row.created_at,
         updated_at: row.updated_at,
      })
   }
}

/// PostgreSQL 実装の ListFilterRepository
#[derive(Debug, Clone)]
pub struct PostgresListFilterRepository {
   pool: PgPool,
}

impl PostgresListFilterRepository {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl ListFilterRepository for PostgresListFilterRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id, %user_id, entity = %entity))]
   async fn find_by_entity(
      &self,
      tenant_id: &TenantId,
      user_id: &UserId,
      entity: &str,
   ) -> Result<Option<ListFilter>, InfraError> {
      let row = sqlx::query_as::<_, ListFilterRow>(
         r#"
         SELECT id, tenant_id, user_id, entity, data, created_at, updated_at
         FROM list_filters
         WHERE tenant_id = $1 AND user_id = $2 AND entity = $3
         "#,
      )
      .bind(tenant_id.as_uuid())
      .bind(user_id.as_uuid())
      .bind(entity)
      .fetch_optional(&self.pool)
      .await?;

      Ok(row.map(ListFilter::from))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(tenant_id = %filter.tenant_id(), entity = %filter.entity()))]
   async fn upsert(&self, tx: &mut TxContext, filter: &ListFilter) -> Result<(), InfraError> {
      sqlx::query(
         r#"
         INSERT INTO list_filters (
             id, tenant_id, user_id, entity, data, created_at, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (tenant_id, user_id, entity)
         DO UPDATE SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
         "#,
      )
      .bind(filter.id().as_uuid())
      .bind(filter.tenant_id().as_uuid())
      .bind(filter.user_id().as_uuid())
      .bind(filter.entity())
      .bind(Json(filter.data()))
      .bind(filter.created_at())
      .bind(filter.updated_at())
      .execute(tx.conn()?)
      .await?;

      Ok(())
   }
}
