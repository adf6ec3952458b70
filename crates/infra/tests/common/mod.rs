//! テスト共通フィクスチャ
//!
//! DB を使う統合テストで共有する定数とエンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使わない関数に dead_code 警告が出る。
#![allow(dead_code)]

use catalog_domain::{
   package::{NewPackage, Package, PackageId, PackageName, PackageSymbol},
   tenant::TenantId,
   user::UserId,
};
use catalog_infra::{
   db::{PgTransactionManager, TransactionManager},
   repository::{PackageRepository, PostgresPackageRepository},
};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

/// テスト用テナント ID
pub fn tenant_id() -> TenantId {
   TenantId::from_uuid("00000000-0000-0000-0000-000000000001".parse().unwrap())
}

/// 別テナントの ID
pub fn other_tenant_id() -> TenantId {
   TenantId::from_uuid("00000000-0000-0000-0000-000000000002".parse().unwrap())
}

/// テスト用ユーザー ID
pub fn user_id() -> UserId {
   UserId::from_uuid("00000000-0000-0000-0000-0000000000aa".parse().unwrap())
}

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
   DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// 作成日時をずらした梱包資材を作る
pub fn new_package(tenant_id: &TenantId, name: &str, symbol: Option<&str>, minutes: i64) -> Package {
   Package::new(NewPackage {
      id:         PackageId::new(),
      tenant_id:  tenant_id.clone(),
      name:       PackageName::new(name).unwrap(),
      symbol:     PackageSymbol::optional(symbol).unwrap(),
      created_by: Some(user_id()),
      now:        test_now() + Duration::minutes(minutes),
   })
}

/// 梱包資材をコミット済みの状態で保存する
pub async fn insert_package(pool: &PgPool, package: &Package) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let repo = PostgresPackageRepository::new(pool.clone());
   let mut tx = tx_manager.begin().await.unwrap();
   repo.insert(&mut tx, package).await.unwrap();
   tx.commit().await.unwrap();
}
