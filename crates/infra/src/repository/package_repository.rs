//! # PackageRepository
//!
//! 梱包資材の永続化を担当するリポジトリ。
//!
//! ## 絞り込みとソート
//!
//! - 名称は常に部分一致（`ILIKE`）で絞り込む。空文字なら全件に一致する
//! - 略号は空でない場合のみ部分一致で絞り込む
//! - 入力中の `%` `_` `\` はエスケープし、文字どおりの部分文字列として扱う
//! - ソート列は [`PackageSortColumn`] の許可リストから組み立て、同順位は `id` で並べる

use async_trait::async_trait;
use catalog_domain::{
   package::{
      Package,
      PackageFilter,
      PackageId,
      PackageListQuery,
      PackageName,
      PackageRecord,
      PackageSortColumn,
      PackageSymbol,
   },
   tenant::TenantId,
   user::UserId,
};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{db::TxContext, error::InfraError};

/// 梱包資材リポジトリトレイト
#[async_trait]
pub trait PackageRepository: Send + Sync {
   /// 新規作成する（テナントは値オブジェクトが持つものを使う）
   async fn insert(&self, tx: &mut TxContext, package: &Package) -> Result<(), InfraError>;

   /// 名称・略号・更新者・更新日時を更新する
   ///
   /// 同じテナントに対象行がなければ `NotFound` を返す。
   async fn update(&self, tx: &mut TxContext, package: &Package) -> Result<(), InfraError>;

   /// 削除する
   ///
   /// 同じテナントに対象行がなければ `NotFound` を返す。
   async fn delete(
      &self,
      tx: &mut TxContext,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<(), InfraError>;

   /// ID で取得する
   async fn find_by_id(
      &self,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<Option<Package>, InfraError>;

   /// トランザクション内で ID で取得し、コミットまで行をロックする
   async fn find_for_update(
      &self,
      tx: &mut TxContext,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<Option<Package>, InfraError>;

   /// 絞り込み・ソート・ページングした一覧を取得する
   async fn list(
      &self,
      tenant_id: &TenantId,
      query: &PackageListQuery,
   ) -> Result<Vec<Package>, InfraError>;

   /// 絞り込み条件に一致する件数を取得する（ページングなし）
   async fn count(&self, tenant_id: &TenantId, filter: &PackageFilter) -> Result<i64, InfraError>;
}

/// DB の packages テーブルの行を表す中間構造体
#[derive(sqlx::FromRow)]
struct PackageRow {
   id:         Uuid,
   tenant_id:  Uuid,
   name:       String,
   symbol:     Option<String>,
   created_by: Option<Uuid>,
   updated_by: Option<Uuid>,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl TryFrom<PackageRow> for Package {
   type Error = InfraError;

   fn try_from(row: PackageRow) -> Result<Self, Self::Error> {
      Ok(Package::from_db(PackageRecord {
         id:         PackageId::from_uuid(row.id),
         tenant_id:  TenantId::from_uuid(row.tenant_id),
         name:       PackageName::new(row.name)
            .map_err(|e| InfraError::corrupt_row("packages", "name", e))?,
         symbol:     PackageSymbol::optional(row.symbol)
            .map_err(|e| InfraError::corrupt_row("packages", "symbol", e))?,
         created_by: row.created_by.map(UserId::from_uuid),
         updated_by: row.updated_by.map(UserId::from_uuid),
         created_at: row.created_at,
         updated_at: row.updated_at,
      }))
   }
}

const SELECT_COLUMNS: &str = "SELECT id, tenant_id, name, symbol, created_by, updated_by, \
                              created_at, updated_at FROM packages";

/// `LIKE` のワイルドカードをエスケープし、部分一致パターンにする
fn contains_pattern(value: &str) -> String {
   let mut pattern = String::with_capacity(value.len() + 2);
   pattern.push('%');
   for c in value.chars() {
      if matches!(c, '%' | '_' | '\\') {
         pattern.push('\\');
      }
      pattern.push(c);
   }
   pattern.push('%');
   pattern
}

/// テナントと絞り込み条件の WHERE 句を追加する
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, tenant_id: &TenantId, filter: &PackageFilter) {
   builder.push(" WHERE tenant_id = ");
   builder.push_bind(*tenant_id.as_uuid());
   builder.push(" AND name ILIKE ");
   builder.push_bind(contains_pattern(filter.name()));
   builder.push(r" ESCAPE '\'");
   if let Some(symbol) = filter.symbol() {
      builder.push(" AND symbol ILIKE ");
      builder.push_bind(contains_pattern(symbol));
      builder.push(r" ESCAPE '\'");
   }
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, query: &PackageListQuery) {
   builder.push(" ORDER BY ");
   builder.push(query.sort.column_name());
   builder.push(" ");
   builder.push(query.order.as_sql());
   if query.sort != PackageSortColumn::Id {
      builder.push(", id ASC");
   }
}

/// PostgreSQL 実装の PackageRepository
#[derive(Debug, Clone)]
pub struct PostgresPackageRepository {
   pool: PgPool,
}

impl PostgresPackageRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl PackageRepository for PostgresPackageRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(id = %package.id(), tenant_id = %package.tenant_id()))]
   async fn insert(&self, tx: &mut TxContext, package: &Package) -> Result<(), InfraError> {
      sqlx::query(
         r#"
         INSERT INTO packages (
             id, tenant_id, name, symbol, created_by, updated_by,
             created_at, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         "#,
      )
      .bind(package.id().as_uuid())
      .bind(package.tenant_id().as_uuid())
      .bind(package.name().as_str())
      .bind(package.symbol().map(PackageSymbol::as_str))
      .bind(package.created_by().map(|id| *id.as_uuid()))
      .bind(package.updated_by().map(|id| *id.as_uuid()))
      .bind(package.created_at())
      .bind(package.updated_at())
      .execute(tx.conn()?)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(id = %package.id(), tenant_id = %package.tenant_id()))]
   async fn update(&self, tx: &mut TxContext, package: &Package) -> Result<(), InfraError> {
      let result = sqlx::query(
         r#"
         UPDATE packages
         SET name = $3, symbol = $4, updated_by = $5, updated_at = $6
         WHERE id = $1 AND tenant_id = $2
         "#,
      )
      .bind(package.id().as_uuid())
      .bind(package.tenant_id().as_uuid())
      .bind(package.name().as_str())
      .bind(package.symbol().map(PackageSymbol::as_str))
      .bind(package.updated_by().map(|id| *id.as_uuid()))
      .bind(package.updated_at())
      .execute(tx.conn()?)
      .await?;

      if result.rows_affected() == 0 {
         return Err(InfraError::not_found("Package", package.id().to_string()));
      }
      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id, %tenant_id))]
   async fn delete(
      &self,
      tx: &mut TxContext,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<(), InfraError> {
      let result = sqlx::query("DELETE FROM packages WHERE id = $1 AND tenant_id = $2")
         .bind(id.as_uuid())
         .bind(tenant_id.as_uuid())
         .execute(tx.conn()?)
         .await?;

      if result.rows_affected() == 0 {
         return Err(InfraError::not_found("Package", id.to_string()));
      }
      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id, %tenant_id))]
   async fn find_by_id(
      &self,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<Option<Package>, InfraError> {
      let row = sqlx::query_as::<_, PackageRow>(&format!(
         "{SELECT_COLUMNS} WHERE id = $1 AND tenant_id = $2"
      ))
      .bind(id.as_uuid())
      .bind(tenant_id.as_uuid())
      .fetch_optional(&self.pool)
      .await?;

      row.map(Package::try_from).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id, %tenant_id))]
   async fn find_for_update(
      &self,
      tx: &mut TxContext,
      id: &PackageId,
      tenant_id: &TenantId,
   ) -> Result<Option<Package>, InfraError> {
      let row = sqlx::query_as::<_, PackageRow>(&format!(
         "{SELECT_COLUMNS} WHERE id = $1 AND tenant_id = $2 FOR UPDATE"
      ))
      .bind(id.as_uuid())
      .bind(tenant_id.as_uuid())
      .fetch_optional(tx.conn()?)
      .await?;

      row.map(Package::try_from).transpose()
   }

   #[tracing::instrument(
      skip_all,
      level = "debug",
      fields(%tenant_id, sort = %query.sort, order = %query.order, limit = query.limit, offset = query.offset)
   )]
   async fn list(
      &self,
      tenant_id: &TenantId,
      query: &PackageListQuery,
   ) -> Result<Vec<Package>, InfraError> {
      let mut builder = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);
      push_filter(&mut builder, tenant_id, &query.filter);
      push_order(&mut builder, query);
      builder.push(" LIMIT ");
      builder.push_bind(query.limit);
      builder.push(" OFFSET ");
      builder.push_bind(query.offset);

      let rows = builder
         .build_query_as::<PackageRow>()
         .fetch_all(&self.pool)
         .await?;

      rows.into_iter().map(Package::try_from).collect()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id))]
   async fn count(&self, tenant_id: &TenantId, filter: &PackageFilter) -> Result<i64, InfraError> {
      let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM packages");
      push_filter(&mut builder, tenant_id, filter);

      let total = builder
         .build_query_scalar::<i64>()
         .fetch_one(&self.pool)
         .await?;

      Ok(total)
   }
}

#[cfg(test)]
mod tests {
   use catalog_domain::package::SortOrder;
   use rstest::rstest;

   use super::*;

   #[test]
   fn test_トレイトオブジェクトとして使用できる() {
      fn assert_object_safe(_: Option<&dyn PackageRepository>) {}
      assert_object_safe(None);
   }

   #[rstest]
   #[case("", "%%")]
   #[case("cx", "%cx%")]
   #[case("50%", r"%50\%%")]
   #[case("a_b", r"%a\_b%")]
   #[case(r"c:\tmp", r"%c:\\tmp%")]
   fn test_部分一致パターンはワイルドカードをエスケープする(
      #[case] input: &str,
      #[case] expected: &str,
   ) {
      assert_eq!(contains_pattern(input), expected);
   }

   #[test]
   fn test_略号が空なら略号の条件を付けない() {
      let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM packages");
      push_filter(&mut builder, &TenantId::new(), &PackageFilter::new("cx", ""));

      let sql = builder.sql();
      assert!(sql.contains("name ILIKE"));
      assert!(!sql.contains("symbol ILIKE"));
   }

   #[test]
   fn test_略号があれば略号の条件を付ける() {
      let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM packages");
      push_filter(&mut builder, &TenantId::new(), &PackageFilter::new("", "CX"));

      assert!(builder.sql().contains("AND symbol ILIKE $3"));
   }

   #[rstest]
   #[case(PackageSortColumn::Name, SortOrder::Asc, " ORDER BY name ASC, id ASC")]
   #[case(PackageSortColumn::CreatedAt, SortOrder::Desc, " ORDER BY created_at DESC, id ASC")]
   #[case(PackageSortColumn::Id, SortOrder::Desc, " ORDER BY id DESC")]
   fn test_ソート句は許可リストのカラム名で組み立てる(
      #[case] sort: PackageSortColumn,
      #[case] order: SortOrder,
      #[case] expected: &str,
   ) {
      let query = PackageListQuery {
         sort,
         order,
         ..Default::default()
      };
      let mut builder = QueryBuilder::<Postgres>::new("");
      push_order(&mut builder, &query);

      assert_eq!(builder.sql(), expected);
   }
}
