//! # リポジトリ実装
//!
//! ドメイン値の永続化を担当するリポジトリトレイトと PostgreSQL 実装。
//!
//! - 作成以外のすべての操作はテナント ID で絞り込む
//! - 書き込みは [`TxContext`](crate::db::TxContext) の中で実行する
//! - 行は中間構造体を経由してドメイン値に変換する

pub mod list_filter_repository;
pub mod package_repository;

pub use list_filter_repository::{ListFilterRepository, PostgresListFilterRepository};
pub use package_repository::{PackageRepository, PostgresPackageRepository};
