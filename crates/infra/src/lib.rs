//! # Catalog インフラ層
//!
//! PostgreSQL との接続と、ドメイン値の永続化を担当する。
//!
//! ## 責務
//!
//! - **データベース接続**: 接続プールとマイグレーション、トランザクション管理
//! - **リポジトリ実装**: 行とドメイン値の相互変換、テナントで絞り込んだ読み書き
//! - **テスト用リポジトリ**: `test-utils` feature で有効になるインメモリ実装
//!
//! ## 依存関係
//!
//! ```text
//! package-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、マイグレーション、[`db::TxContext`]
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリトレイトと PostgreSQL 実装
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use catalog_infra::{db, repository::PostgresPackageRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!    let pool = db::create_pool("postgres://localhost/catalog", 5).await?;
//!    db::run_migrations(&pool).await?;
//!    let repository = PostgresPackageRepository::new(pool);
//!    Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
