//! # 依存コンポーネントの組み立て
//!
//! HTTP サーバーと Lambda の両方が同じ手順でハンドラの状態を用意する。

use std::sync::Arc;

use anyhow::Context;
use catalog_domain::clock::SystemClock;
use catalog_infra::{
   db::{self, PgTransactionManager},
   repository::{PostgresListFilterRepository, PostgresPackageRepository},
};
use sqlx::PgPool;

use crate::{config::PackageServiceConfig, handler::PackageState};

/// 接続プールからハンドラの状態を組み立てる
pub fn package_state(pool: PgPool) -> PackageState {
   PackageState::new(
      Arc::new(PostgresPackageRepository::new(pool.clone())),
      Arc::new(PostgresListFilterRepository::new(pool.clone())),
      Arc::new(PgTransactionManager::new(pool)),
      Arc::new(SystemClock),
   )
}

/// データベースに接続し、ハンドラの状態を用意する
///
/// `RUN_MIGRATIONS` が有効ならマイグレーションも適用する。
pub async fn bootstrap(config: &PackageServiceConfig) -> anyhow::Result<PackageState> {
   let pool = db::create_pool(&config.database_url, config.max_connections)
      .await
      .context("データベース接続に失敗しました")?;
   tracing::info!(max_connections = config.max_connections, "データベースに接続しました");

   if config.run_migrations {
      db::run_migrations(&pool)
         .await
         .context("マイグレーションの適用に失敗しました")?;
      tracing::info!("マイグレーションを適用しました");
   }

   Ok(package_state(pool))
}
